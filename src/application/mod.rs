pub mod ingestion_service;
