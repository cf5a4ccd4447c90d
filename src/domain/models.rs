use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct ObjectToProcess {
    pub bucket: String,
    pub key: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    CompletedWithErrors,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionRun {
    pub run_id: String,
    pub bucket: String,
    pub pattern: String,
    pub target_table: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub objects_matched: usize,
    pub objects_ingested: usize,
    pub objects_failed: usize,
    pub documents_written: usize,
    pub status: RunStatus,
}

impl IngestionRun {
    pub fn start(run_id: String, bucket: &str, pattern: &str, target_table: &str) -> Self {
        Self {
            run_id,
            bucket: bucket.to_string(),
            pattern: pattern.to_string(),
            target_table: target_table.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            objects_matched: 0,
            objects_ingested: 0,
            objects_failed: 0,
            documents_written: 0,
            status: RunStatus::Running,
        }
    }
}
