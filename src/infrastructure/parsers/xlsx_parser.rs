use calamine::{DataType, Reader, Xlsx};
use std::io::Cursor;
use tracing::{debug, error, info};
use crate::domain::error::IngestionError;

pub fn parse_xlsx(bytes: &[u8]) -> Result<Vec<serde_json::Value>, IngestionError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = Xlsx::new(cursor).map_err(|e| {
        error!("Failed to open XLSX workbook: {}", e);
        IngestionError::Parse(e.to_string())
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestionError::Parse("workbook has no sheets".to_string()))?;
    debug!("Reading first worksheet: {}", sheet_name);

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| IngestionError::Parse(format!("worksheet '{}' not found", sheet_name)))?
        .map_err(|e| {
            error!("Failed to read worksheet '{}': {}", sheet_name, e);
            IngestionError::Parse(e.to_string())
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
        None => {
            info!("Worksheet '{}' is empty", sheet_name);
            return Ok(Vec::new());
        }
    };

    let mut documents = Vec::new();
    for row in rows {
        let mut doc = serde_json::Map::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(i).map(cell_to_json).unwrap_or(serde_json::Value::Null);
            doc.insert(header.clone(), value);
        }
        documents.push(serde_json::Value::Object(doc));
    }

    info!("Parsed {} rows from worksheet '{}'", documents.len(), sheet_name);
    Ok(documents)
}

fn cell_to_json(cell: &DataType) -> serde_json::Value {
    match cell {
        DataType::Empty => serde_json::Value::Null,
        DataType::String(s) => serde_json::Value::String(s.clone()),
        DataType::Float(f) => serde_json::json!(f),
        DataType::Int(i) => serde_json::json!(i),
        DataType::Bool(b) => serde_json::Value::Bool(*b),
        other => serde_json::Value::String(other.to_string()),
    }
}
