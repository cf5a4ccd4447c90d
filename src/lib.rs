pub mod application;
pub mod cli_service;
pub mod domain;
pub mod infrastructure;
