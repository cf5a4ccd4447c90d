use std::fmt;
use tracing::warn;
use url::Url;

use crate::domain::error::IngestionError;

/// Connection string for an S3-compatible source:
/// `s3://?access_key_id=<id>&secret_access_key=<key>`
#[derive(Clone)]
pub struct SourceUri {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: Option<String>,
}

impl SourceUri {
    pub fn parse(raw: &str) -> Result<Self, IngestionError> {
        let url = Url::parse(raw)
            .map_err(|e| IngestionError::InvalidSourceUri(e.to_string()))?;

        if url.scheme() != "s3" {
            return Err(IngestionError::InvalidSourceUri(format!(
                "expected scheme 's3', got '{}'", url.scheme()
            )));
        }

        if let Some(host) = url.host_str() {
            if !host.is_empty() {
                return Err(IngestionError::InvalidSourceUri(format!(
                    "unexpected host '{}': the bucket name belongs in the source table, not the URI", host
                )));
            }
        }

        let mut access_key_id = None;
        let mut secret_access_key = None;
        let mut endpoint_url = None;

        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "access_key_id" => access_key_id = Some(value.trim().to_string()),
                "secret_access_key" => secret_access_key = Some(value.trim().to_string()),
                "endpoint_url" => endpoint_url = Some(value.trim().to_string()),
                other => {
                    warn!("Ignoring unknown source URI parameter: {}", other);
                }
            }
        }

        let access_key_id = access_key_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| IngestionError::InvalidSourceUri(
                "missing required parameter 'access_key_id'".to_string(),
            ))?;
        let secret_access_key = secret_access_key
            .filter(|v| !v.is_empty())
            .ok_or_else(|| IngestionError::InvalidSourceUri(
                "missing required parameter 'secret_access_key'".to_string(),
            ))?;

        Ok(Self { access_key_id, secret_access_key, endpoint_url })
    }

    /// Truncated access key id, safe for log lines.
    pub fn redacted_access_key(&self) -> String {
        let shown = 4.min(self.access_key_id.len());
        format!("{}***", &self.access_key_id[..shown])
    }
}

impl fmt::Debug for SourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUri")
            .field("access_key_id", &self.redacted_access_key())
            .field("secret_access_key", &"***")
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_template() {
        let uri = SourceUri::parse("s3://?access_key_id=AKIA123&secret_access_key=abc123").unwrap();
        assert_eq!(uri.access_key_id, "AKIA123");
        assert_eq!(uri.secret_access_key, "abc123");
        assert_eq!(uri.endpoint_url, None);
    }

    #[test]
    fn requires_access_key_id() {
        let err = SourceUri::parse("s3://?secret_access_key=abc123").unwrap_err();
        assert!(err.to_string().contains("access_key_id"));
    }

    #[test]
    fn requires_secret_access_key() {
        let err = SourceUri::parse("s3://?access_key_id=AKIA123").unwrap_err();
        assert!(err.to_string().contains("secret_access_key"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(SourceUri::parse("gs://?access_key_id=a&secret_access_key=b").is_err());
    }

    #[test]
    fn rejects_bucket_in_host_position() {
        let err = SourceUri::parse("s3://my_bucket?access_key_id=a&secret_access_key=b").unwrap_err();
        assert!(err.to_string().contains("source table"));
    }

    #[test]
    fn decodes_percent_encoded_credentials() {
        let uri = SourceUri::parse("s3://?access_key_id=AKIA&secret_access_key=a%2Fb%2Bc%3D").unwrap();
        assert_eq!(uri.secret_access_key, "a/b+c=");
    }

    #[test]
    fn accepts_optional_endpoint() {
        let uri = SourceUri::parse(
            "s3://?access_key_id=a&secret_access_key=b&endpoint_url=http%3A%2F%2Flocalhost%3A9000",
        )
        .unwrap();
        assert_eq!(uri.endpoint_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn debug_output_never_contains_the_secret() {
        let uri = SourceUri::parse("s3://?access_key_id=AKIA123&secret_access_key=topsecret").unwrap();
        let printed = format!("{:?}", uri);
        assert!(!printed.contains("topsecret"));
    }
}
