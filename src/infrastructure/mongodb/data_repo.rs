use async_trait::async_trait;
use mongodb::{Client, Collection, bson::Document};
use tracing::{debug, error, info};
use crate::domain::{error::IngestionError, ports::DataRepository};

pub struct MongoDataRepository {
    client: Client,
    database: String,
}

impl MongoDataRepository {
    pub fn new(client: Client, database: String) -> Self {
        debug!("Initializing MongoDB data repository for database: {}", database);
        Self { client, database }
    }
}

#[async_trait]
impl DataRepository for MongoDataRepository {
    async fn insert_documents(&self, target_table: &str, documents: &[serde_json::Value], run_id: &str) -> Result<usize, IngestionError> {
        if documents.is_empty() {
            info!("No documents to insert into {}", target_table);
            return Ok(0);
        }

        let collection: Collection<Document> = self.client.database(&self.database).collection(target_table);
        debug!("Inserting {} documents into {}.{}", documents.len(), self.database, target_table);

        let docs: Vec<Document> = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let mut bson_doc = mongodb::bson::to_document(doc)
                    .map_err(|e| {
                        error!("Failed to convert document {} to BSON: {}", i, e);
                        IngestionError::Database(e.to_string())
                    })?;
                bson_doc.insert("_ingest_run_id", run_id);
                Ok(bson_doc)
            })
            .collect::<Result<Vec<_>, IngestionError>>()?;

        let result = collection
            .insert_many(docs, None)
            .await
            .map_err(|e| {
                error!("Failed to insert documents into {}: {}", target_table, e);
                IngestionError::Database(e.to_string())
            })?;

        info!("Inserted {} documents into collection: {}", result.inserted_ids.len(), target_table);
        Ok(result.inserted_ids.len())
    }
}
