pub mod destination;
pub mod error;
pub mod models;
pub mod ports;
pub mod source_uri;
pub mod table_ref;
