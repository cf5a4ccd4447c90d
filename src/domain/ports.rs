use async_trait::async_trait;
use crate::domain::{
    error::IngestionError,
    models::{IngestionRun, ObjectToProcess},
};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectToProcess>, IngestionError>;
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, IngestionError>;
}

#[async_trait]
pub trait DataParser: Send + Sync {
    async fn parse(&self, file_bytes: &[u8], file_type: &str) -> Result<Vec<serde_json::Value>, IngestionError>;
}

#[async_trait]
pub trait DataRepository: Send + Sync {
    async fn insert_documents(&self, target_table: &str, documents: &[serde_json::Value], run_id: &str) -> Result<usize, IngestionError>;
}

#[async_trait]
pub trait RunLogRepository: Send + Sync {
    async fn record_run(&self, run: &IngestionRun) -> Result<(), IngestionError>;
}
