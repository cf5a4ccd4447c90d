use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};
use crate::domain::{error::IngestionError, ports::DataRepository};

pub struct CouchDataRepository {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl CouchDataRepository {
    pub fn new(base_url: String, username: Option<String>, password: Option<String>) -> Self {
        debug!("Initializing CouchDB data repository for {}", base_url);
        Self {
            client: Client::new(),
            base_url,
            username,
            password,
        }
    }
}

#[async_trait]
impl DataRepository for CouchDataRepository {
    async fn insert_documents(&self, target_table: &str, documents: &[serde_json::Value], run_id: &str) -> Result<usize, IngestionError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let url = format!("{}/{}/_bulk_docs", self.base_url.trim_end_matches('/'), target_table);
        debug!("Posting {} documents to {}", documents.len(), url);

        let docs: Vec<serde_json::Value> = documents
            .iter()
            .map(|doc| {
                let mut doc = doc.clone();
                if let Some(obj) = doc.as_object_mut() {
                    obj.insert("_ingest_run_id".to_string(), serde_json::Value::String(run_id.to_string()));
                }
                doc
            })
            .collect();

        let bulk_doc = serde_json::json!({ "docs": docs });

        let mut request = self.client.post(&url).json(&bulk_doc);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to post documents to {}: {}", url, e);
            IngestionError::Database(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("CouchDB rejected bulk insert ({}): {}", status, body);
            return Err(IngestionError::Database(format!(
                "bulk insert into '{}' failed with status {}", target_table, status
            )));
        }

        info!("Inserted {} documents into CouchDB database: {}", docs.len(), target_table);
        Ok(docs.len())
    }
}
