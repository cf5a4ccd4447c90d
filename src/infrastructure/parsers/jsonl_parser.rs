use tracing::{error, info};
use crate::domain::error::IngestionError;

pub fn parse_jsonl(bytes: &[u8]) -> Result<Vec<serde_json::Value>, IngestionError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| {
            error!("JSONL content is not valid UTF-8: {}", e);
            IngestionError::Parse(e.to_string())
        })?;

    let mut documents = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let document: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| {
                error!("Invalid JSON on line {}: {}", line_number + 1, e);
                IngestionError::Parse(format!("line {}: {}", line_number + 1, e))
            })?;
        documents.push(document);
    }

    info!("Parsed {} documents from JSONL", documents.len());
    Ok(documents)
}
