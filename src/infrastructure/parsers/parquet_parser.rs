use bytes::Bytes;
use parquet::file::reader::{FileReader, SerializedFileReader};
use tracing::{error, info};
use crate::domain::error::IngestionError;

pub fn parse_parquet(bytes: &[u8]) -> Result<Vec<serde_json::Value>, IngestionError> {
    let reader = SerializedFileReader::new(Bytes::copy_from_slice(bytes))
        .map_err(|e| {
            error!("Failed to open parquet file: {}", e);
            IngestionError::Parse(e.to_string())
        })?;

    let rows = reader.get_row_iter(None)
        .map_err(|e| {
            error!("Failed to read parquet rows: {}", e);
            IngestionError::Parse(e.to_string())
        })?;

    let mut documents = Vec::new();
    for row in rows {
        let row = row.map_err(|e| {
            error!("Failed to decode parquet row {}: {}", documents.len() + 1, e);
            IngestionError::Parse(e.to_string())
        })?;
        documents.push(row.to_json_value());
    }

    info!("Parsed {} rows from parquet", documents.len());
    Ok(documents)
}
