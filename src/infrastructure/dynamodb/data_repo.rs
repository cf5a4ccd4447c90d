use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, types::AttributeValue};
use std::collections::HashMap;
use tracing::{debug, error, info};
use uuid::Uuid;
use crate::domain::{error::IngestionError, ports::DataRepository};

pub struct DynamoDataRepository {
    client: Client,
}

impl DynamoDataRepository {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataRepository for DynamoDataRepository {
    async fn insert_documents(&self, target_table: &str, documents: &[serde_json::Value], run_id: &str) -> Result<usize, IngestionError> {
        debug!("Inserting {} items into DynamoDB table: {}", documents.len(), target_table);
        let mut written = 0;

        for doc in documents {
            let mut item = HashMap::new();

            if let serde_json::Value::Object(obj) = doc {
                for (key, value) in obj {
                    let attr_value = match value {
                        serde_json::Value::String(s) => AttributeValue::S(s.clone()),
                        serde_json::Value::Number(n) => AttributeValue::N(n.to_string()),
                        serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
                        serde_json::Value::Null => AttributeValue::Null(true),
                        _ => AttributeValue::S(value.to_string()),
                    };
                    item.insert(key.clone(), attr_value);
                }
            }

            item.insert("_ingest_id".to_string(), AttributeValue::S(Uuid::new_v4().to_string()));
            item.insert("_ingest_run_id".to_string(), AttributeValue::S(run_id.to_string()));

            self.client
                .put_item()
                .table_name(target_table)
                .set_item(Some(item))
                .send()
                .await
                .map_err(|e| {
                    error!("Failed to put item into {}: {}", target_table, e);
                    IngestionError::Database(e.to_string())
                })?;
            written += 1;
        }

        info!("Inserted {} items into DynamoDB table: {}", written, target_table);
        Ok(written)
    }
}
