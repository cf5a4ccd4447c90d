pub mod csv_parser;
pub mod jsonl_parser;
pub mod parquet_parser;
pub mod xlsx_parser;
pub mod xml_parser;
