use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::{debug, error, info};
use crate::domain::error::IngestionError;

pub fn parse_csv(bytes: &[u8]) -> Result<Vec<serde_json::Value>, IngestionError> {
    let cursor = Cursor::new(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(cursor);

    let headers = reader.headers()
        .map_err(|e| {
            error!("Failed to read CSV headers: {}", e);
            IngestionError::Parse(e.to_string())
        })?.clone();

    debug!("CSV headers: {:?}", headers);

    let mut documents = Vec::new();
    let mut row_count = 0;

    for record in reader.records() {
        let record = record.map_err(|e| {
            error!("Failed to read CSV record at row {}: {}", row_count + 1, e);
            IngestionError::Parse(e.to_string())
        })?;

        row_count += 1;
        let mut doc = serde_json::Map::new();

        for (i, header) in headers.iter().enumerate() {
            let value = match record.get(i) {
                Some("") | None => serde_json::Value::Null,
                Some(field) => serde_json::Value::String(field.to_string()),
            };
            doc.insert(header.to_string(), value);
        }

        documents.push(serde_json::Value::Object(doc));

        if row_count % 10000 == 0 {
            debug!("Processed {} CSV rows", row_count);
        }
    }

    info!("Parsed {} rows from CSV with {} columns", row_count, headers.len());
    Ok(documents)
}
