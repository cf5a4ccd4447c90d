use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use tracing::{debug, error, info, warn};

use crate::domain::{
    error::IngestionError,
    models::ObjectToProcess,
    ports::ObjectStore,
    source_uri::SourceUri,
};

pub struct S3Adapter {
    client: aws_sdk_s3::Client,
}

impl S3Adapter {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client from the credentials carried in the source URI.
    pub async fn from_source(source: &SourceUri) -> Self {
        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        info!(
            "Creating S3 client - region: {}, access_key: {}",
            region,
            source.redacted_access_key()
        );

        let credentials = Credentials::new(
            source.access_key_id.clone(),
            source.secret_access_key.clone(),
            None,
            None,
            "source-uri",
        );

        let mut config_loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(credentials);

        let endpoint_url = source
            .endpoint_url
            .clone()
            .or_else(|| std::env::var("AWS_ENDPOINT_URL").ok());
        if let Some(endpoint) = &endpoint_url {
            info!("Using custom S3 endpoint: {}", endpoint);
            config_loader = config_loader.endpoint_url(endpoint);
        }

        let aws_config = config_loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&aws_config);
        // Path-style addressing for MinIO/LocalStack style endpoints
        if endpoint_url.is_some() {
            s3_config = s3_config.force_path_style(true);
        }

        debug!("S3 client initialized");
        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Adapter {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectToProcess>, IngestionError> {
        debug!("Listing s3://{} under prefix '{}'", bucket, prefix);

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut pages = 0;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket);
            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                error!("Failed to list bucket '{}': {}", bucket, e);
                IngestionError::Storage(e.to_string())
            })?;
            pages += 1;

            if let Some(contents) = response.contents {
                for object in contents {
                    let key = object.key.unwrap_or_default();
                    if key.is_empty() || key.ends_with('/') {
                        // Console-created folder placeholders
                        debug!("Skipping placeholder key: {}", key);
                        continue;
                    }
                    objects.push(ObjectToProcess {
                        bucket: bucket.to_string(),
                        key,
                        size: object.size.unwrap_or(0) as u64,
                    });
                }
            }

            if response.is_truncated.unwrap_or(false) {
                continuation_token = response.next_continuation_token;
            } else {
                break;
            }
        }

        debug!("Listed {} objects in {} pages", objects.len(), pages);
        if objects.is_empty() {
            warn!("Bucket '{}' has no objects under prefix '{}'", bucket, prefix);
        }
        Ok(objects)
    }

    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, IngestionError> {
        debug!("Fetching s3://{}/{}", bucket, key);

        let response = self.client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch s3://{}/{}: {}", bucket, key, e);
                IngestionError::Storage(format!("failed to fetch '{}': {}", key, e))
            })?;

        let bytes = response.body.collect().await
            .map_err(|e| {
                error!("Failed to read body of s3://{}/{}: {}", bucket, key, e);
                IngestionError::Storage(e.to_string())
            })?
            .into_bytes();

        debug!("Fetched {} bytes from {}", bytes.len(), key);
        Ok(bytes.to_vec())
    }
}
