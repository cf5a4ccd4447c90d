use url::Url;

use crate::domain::error::IngestionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    MongoDb,
    DynamoDb,
    CouchDb,
}

/// Destination connection string. The raw URI is handed to the selected
/// driver untouched; only the scheme is interpreted here.
#[derive(Debug, Clone)]
pub struct DestinationUri {
    pub kind: DestinationKind,
    pub raw: String,
    pub url: Url,
}

impl DestinationUri {
    pub fn parse(raw: &str) -> Result<Self, IngestionError> {
        let url = Url::parse(raw)
            .map_err(|e| IngestionError::InvalidDestination(e.to_string()))?;

        let kind = match url.scheme() {
            "mongodb" | "mongodb+srv" => DestinationKind::MongoDb,
            "dynamodb" => DestinationKind::DynamoDb,
            "couchdb" | "couchdbs" => DestinationKind::CouchDb,
            other => {
                return Err(IngestionError::InvalidDestination(format!(
                    "unsupported destination scheme '{}'", other
                )))
            }
        };

        Ok(Self { kind, raw: raw.to_string(), url })
    }

    /// Database name from the URI path, when one is present.
    pub fn database(&self) -> Option<String> {
        let db = self.url.path().trim_matches('/');
        if db.is_empty() {
            None
        } else {
            Some(db.to_string())
        }
    }
}

/// Destination table reference: `<namespace>.<table>` or bare `<table>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationTable {
    pub namespace: Option<String>,
    pub name: String,
}

impl DestinationTable {
    pub fn parse(raw: &str) -> Result<Self, IngestionError> {
        let (namespace, name) = match raw.split_once('.') {
            Some((ns, name)) => (Some(ns), name),
            None => (None, raw),
        };

        if name.is_empty() || namespace.map_or(false, str::is_empty) {
            return Err(IngestionError::InvalidDestination(format!(
                "invalid destination table '{}': expected '<table>' or '<namespace>.<table>'", raw
            )));
        }

        Ok(Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        })
    }
}
