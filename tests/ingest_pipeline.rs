use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use s3_ingest::application::ingestion_service::{IngestionRequest, IngestionService};
use s3_ingest::domain::{
    error::IngestionError,
    models::{IngestionRun, ObjectToProcess, RunStatus},
    ports::{DataRepository, ObjectStore, RunLogRepository},
    table_ref::TableReference,
};
use s3_ingest::infrastructure::parser_adapter::ParserAdapter;

struct FakeBucket {
    objects: Vec<(String, Vec<u8>)>,
}

impl FakeBucket {
    fn new(objects: Vec<(&str, &[u8])>) -> Self {
        Self {
            objects: objects
                .into_iter()
                .map(|(key, bytes)| (key.to_string(), bytes.to_vec()))
                .collect(),
        }
    }
}

#[async_trait]
impl ObjectStore for FakeBucket {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectToProcess>, IngestionError> {
        Ok(self
            .objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, bytes)| ObjectToProcess {
                bucket: bucket.to_string(),
                key: key.clone(),
                size: bytes.len() as u64,
            })
            .collect())
    }

    async fn fetch_object(&self, _bucket: &str, key: &str) -> Result<Vec<u8>, IngestionError> {
        self.objects
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| IngestionError::Storage(format!("no such key: {}", key)))
    }
}

#[derive(Default)]
struct FakeDatabase {
    tables: Mutex<HashMap<String, Vec<serde_json::Value>>>,
}

#[async_trait]
impl DataRepository for FakeDatabase {
    async fn insert_documents(&self, target_table: &str, documents: &[serde_json::Value], run_id: &str) -> Result<usize, IngestionError> {
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(target_table.to_string()).or_default();
        for doc in documents {
            let mut doc = doc.clone();
            if let Some(obj) = doc.as_object_mut() {
                obj.insert("_ingest_run_id".to_string(), serde_json::json!(run_id));
            }
            rows.push(doc);
        }
        Ok(documents.len())
    }
}

#[derive(Default)]
struct FakeRunLog {
    runs: Mutex<Vec<IngestionRun>>,
}

#[async_trait]
impl RunLogRepository for FakeRunLog {
    async fn record_run(&self, run: &IngestionRun) -> Result<(), IngestionError> {
        self.runs.lock().unwrap().push(run.clone());
        Ok(())
    }
}

fn service_for(bucket: FakeBucket) -> (IngestionService, Arc<FakeDatabase>, Arc<FakeRunLog>) {
    let database = Arc::new(FakeDatabase::default());
    let run_log = Arc::new(FakeRunLog::default());
    let service = IngestionService::new(
        Arc::new(bucket),
        Arc::new(ParserAdapter::new()),
        database.clone(),
        run_log.clone(),
    );
    (service, database, run_log)
}

fn request_for(source_table: &str, target_table: &str) -> IngestionRequest {
    IngestionRequest {
        table: TableReference::parse(source_table).unwrap(),
        target_table: target_table.to_string(),
        concurrency: 4,
    }
}

#[tokio::test]
async fn ingests_one_csv_file_into_a_table() {
    let bucket = FakeBucket::new(vec![(
        "students/students_details.csv",
        b"id,name\n1,Alice\n2,Bob\n" as &[u8],
    )]);
    let (service, database, run_log) = service_for(bucket);

    let run = service
        .ingest(request_for("my_bucket/students/students_details.csv", "students_details"))
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.documents_written, 2);

    let tables = database.tables.lock().unwrap();
    let rows = &tables["students_details"];
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Alice");
    assert_eq!(rows[0]["_ingest_run_id"], serde_json::json!(run.run_id));

    let runs = run_log.runs.lock().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].objects_ingested, 1);
}

#[tokio::test]
async fn glob_run_mixes_csv_and_jsonl_objects() {
    let bucket = FakeBucket::new(vec![
        ("exports/2024/a.jsonl", b"{\"id\":1}\n{\"id\":2}\n" as &[u8]),
        ("exports/2024/deep/b.jsonl", b"{\"id\":3}\n" as &[u8]),
        ("exports/2024/readme.txt", b"not data" as &[u8]),
    ]);
    let (service, database, _) = service_for(bucket);

    let run = service
        .ingest(request_for("my_bucket/exports/**/*.jsonl", "events"))
        .await
        .unwrap();

    assert_eq!(run.objects_matched, 2);
    assert_eq!(run.documents_written, 3);

    let tables = database.tables.lock().unwrap();
    assert_eq!(tables["events"].len(), 3);
}

#[tokio::test]
async fn top_level_glob_ignores_nested_objects() {
    let bucket = FakeBucket::new(vec![
        ("top.csv", b"id\n1\n" as &[u8]),
        ("nested/skip.csv", b"id\n2\n" as &[u8]),
    ]);
    let (service, database, _) = service_for(bucket);

    let run = service
        .ingest(request_for("my_bucket/*.csv", "rows"))
        .await
        .unwrap();

    assert_eq!(run.objects_matched, 1);
    let tables = database.tables.lock().unwrap();
    assert_eq!(tables["rows"].len(), 1);
    assert_eq!(tables["rows"][0]["id"], "1");
}

#[tokio::test]
async fn unsupported_object_marks_the_run_with_errors() {
    let bucket = FakeBucket::new(vec![
        ("data/good.jsonl", b"{\"id\":1}\n" as &[u8]),
        ("data/archive.zip", b"PK" as &[u8]),
    ]);
    let (service, _, run_log) = service_for(bucket);

    let run = service
        .ingest(request_for("my_bucket/data/*", "rows"))
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::CompletedWithErrors);
    assert_eq!(run.objects_failed, 1);
    assert_eq!(run.documents_written, 1);

    let runs = run_log.runs.lock().unwrap();
    assert_eq!(runs[0].status, RunStatus::CompletedWithErrors);
}
