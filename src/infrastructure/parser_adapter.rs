use async_trait::async_trait;
use tracing::debug;

use crate::domain::{error::IngestionError, ports::DataParser};
use crate::infrastructure::parsers::{
    csv_parser, jsonl_parser, parquet_parser, xlsx_parser, xml_parser,
};

pub struct ParserAdapter;

impl ParserAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ParserAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataParser for ParserAdapter {
    async fn parse(&self, file_bytes: &[u8], file_type: &str) -> Result<Vec<serde_json::Value>, IngestionError> {
        debug!("Dispatching parser for file type: {}", file_type);
        match file_type {
            "csv" => csv_parser::parse_csv(file_bytes),
            "jsonl" | "ndjson" => jsonl_parser::parse_jsonl(file_bytes),
            "parquet" => parquet_parser::parse_parquet(file_bytes),
            "xml" => xml_parser::parse_xml(file_bytes),
            "xlsx" => xlsx_parser::parse_xlsx(file_bytes),
            other => Err(IngestionError::UnsupportedFormat(other.to_string())),
        }
    }
}
