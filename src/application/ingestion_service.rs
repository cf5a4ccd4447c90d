use std::sync::Arc;
use futures_util::{stream, StreamExt};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{
    error::IngestionError,
    models::{IngestionRun, ObjectToProcess, RunStatus},
    ports::{DataParser, DataRepository, ObjectStore, RunLogRepository},
    table_ref::TableReference,
};

pub struct IngestionRequest {
    pub table: TableReference,
    pub target_table: String,
    pub concurrency: usize,
}

pub struct IngestionService {
    object_store: Arc<dyn ObjectStore>,
    data_parser: Arc<dyn DataParser>,
    data_repo: Arc<dyn DataRepository>,
    run_log: Arc<dyn RunLogRepository>,
}

impl IngestionService {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        data_parser: Arc<dyn DataParser>,
        data_repo: Arc<dyn DataRepository>,
        run_log: Arc<dyn RunLogRepository>,
    ) -> Self {
        Self {
            object_store,
            data_parser,
            data_repo,
            run_log,
        }
    }

    pub async fn ingest(&self, request: IngestionRequest) -> Result<IngestionRun, IngestionError> {
        let run_id = Uuid::new_v4().to_string();
        let table = &request.table;
        info!("Starting ingestion run {} for s3://{}/{}", run_id, table.bucket, table.pattern);

        let mut run = IngestionRun::start(run_id.clone(), &table.bucket, &table.pattern, &request.target_table);

        // Step 1: Resolve the glob against the bucket
        debug!("Step 1: Resolving objects for pattern: {}", table.pattern);
        let objects = match self.resolve_objects(table).await {
            Ok(objects) => objects,
            Err(e) => {
                error!("Failed to resolve objects for {}/{}: {}", table.bucket, table.pattern, e);
                run.status = RunStatus::Failed;
                run.finished_at = Some(chrono::Utc::now());
                self.record_run(&run).await;
                return Err(e);
            }
        };

        if objects.is_empty() {
            warn!("No objects in bucket '{}' match pattern '{}'", table.bucket, table.pattern);
            run.status = RunStatus::Failed;
            run.finished_at = Some(chrono::Utc::now());
            self.record_run(&run).await;
            return Err(IngestionError::NoMatchingObjects {
                bucket: table.bucket.clone(),
                pattern: table.pattern.clone(),
            });
        }

        run.objects_matched = objects.len();
        info!("Matched {} objects in bucket '{}'", objects.len(), table.bucket);
        for object in &objects {
            debug!("Matched object: {} ({} bytes)", object.key, object.size);
        }

        // Step 2: Fetch, parse and store each object
        let concurrency = request.concurrency.max(1);
        debug!("Step 2: Processing {} objects with concurrency {}", objects.len(), concurrency);
        let target_table = request.target_table.as_str();
        let run_id_ref = run_id.as_str();
        let outcomes: Vec<(String, Result<usize, IngestionError>)> = stream::iter(objects)
            .map(|object| async move {
                let key = object.key.clone();
                let outcome = self.process_object(&object, target_table, run_id_ref).await;
                (key, outcome)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        for (key, outcome) in outcomes {
            match outcome {
                Ok(documents) => {
                    run.objects_ingested += 1;
                    run.documents_written += documents;
                }
                Err(e) => {
                    error!("Failed to ingest object '{}': {}", key, e);
                    run.objects_failed += 1;
                }
            }
        }

        run.finished_at = Some(chrono::Utc::now());
        run.status = if run.objects_failed == 0 {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithErrors
        };
        self.record_run(&run).await;

        info!(
            "✅ Ingestion run {} finished - {} documents from {}/{} objects stored in {}",
            run.run_id, run.documents_written, run.objects_ingested, run.objects_matched, run.target_table
        );
        Ok(run)
    }

    async fn resolve_objects(&self, table: &TableReference) -> Result<Vec<ObjectToProcess>, IngestionError> {
        // An exact reference needs no listing, only GetObject access
        if table.is_exact() {
            debug!("Exact reference, fetching {} directly", table.pattern);
            return Ok(vec![ObjectToProcess {
                bucket: table.bucket.clone(),
                key: table.pattern.clone(),
                size: 0,
            }]);
        }

        let prefix = table.list_prefix();
        debug!("Listing bucket '{}' under prefix '{}'", table.bucket, prefix);
        let listed = self.object_store.list_objects(&table.bucket, &prefix).await?;
        debug!("Listing returned {} objects", listed.len());

        let matched = listed
            .into_iter()
            .filter(|object| {
                let keep = table.matches(&object.key);
                if !keep {
                    debug!("Skipping non-matching key: {}", object.key);
                }
                keep
            })
            .collect();
        Ok(matched)
    }

    async fn process_object(
        &self,
        object: &ObjectToProcess,
        target_table: &str,
        run_id: &str,
    ) -> Result<usize, IngestionError> {
        info!("Processing object: s3://{}/{}", object.bucket, object.key);

        let file_bytes = self.object_store.fetch_object(&object.bucket, &object.key).await
            .map_err(|e| {
                error!("Failed to fetch object {}/{}: {}", object.bucket, object.key, e);
                e
            })?;
        debug!("Fetched {} bytes for key {}", file_bytes.len(), object.key);

        let file_type = self.extract_file_type(&object.key);
        debug!("Detected file type '{}' for key {}", file_type, object.key);

        let documents = self.data_parser.parse(&file_bytes, &file_type).await
            .map_err(|e| {
                error!("Failed to parse object {}: {}", object.key, e);
                e
            })?;
        info!("Parsed {} documents from {}", documents.len(), object.key);

        let written = self.data_repo.insert_documents(target_table, &documents, run_id).await
            .map_err(|e| {
                error!("Failed to store documents for {}: {}", object.key, e);
                e
            })?;
        debug!("Stored {} documents from {} into {}", written, object.key, target_table);

        Ok(written)
    }

    async fn record_run(&self, run: &IngestionRun) {
        if let Err(e) = self.run_log.record_run(run).await {
            warn!("Failed to record ingestion run {}: {}", run.run_id, e);
        }
    }

    fn extract_file_type(&self, key: &str) -> String {
        let file_type = key.split('.').last().unwrap_or("").to_lowercase();

        if file_type.is_empty() {
            warn!("No file extension found in key: {}", key);
        }

        file_type
    }
}
