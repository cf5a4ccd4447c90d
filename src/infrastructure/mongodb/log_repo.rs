use async_trait::async_trait;
use mongodb::{Client, Collection, bson::doc, options::ReplaceOptions};
use tracing::{debug, error};
use crate::domain::{error::IngestionError, models::IngestionRun, ports::RunLogRepository};

pub struct MongoRunLogRepository {
    collection: Collection<IngestionRun>,
}

impl MongoRunLogRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        debug!("Initializing MongoDB run log repository for database: {}", database);
        let collection = client.database(database).collection("ingestion_runs");
        Self { collection }
    }
}

#[async_trait]
impl RunLogRepository for MongoRunLogRepository {
    async fn record_run(&self, run: &IngestionRun) -> Result<(), IngestionError> {
        debug!("Recording ingestion run {} ({:?})", run.run_id, run.status);

        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "run_id": &run.run_id }, run, options)
            .await
            .map_err(|e| {
                error!("Failed to record run {}: {}", run.run_id, e);
                IngestionError::Database(e.to_string())
            })?;

        Ok(())
    }
}
