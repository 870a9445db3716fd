//! Amazon S3 object store.
//!
//! Keys map one to one onto object keys in a single bucket:
//! ```text
//! s3://{bucket}/{key}
//! ```

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use crate::shared::infrastructure::object_store::{ObjectStore, ObjectStoreError};

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Uses default credentials from the environment (AWS_ACCESS_KEY_ID,
    /// AWS_SECRET_ACCESS_KEY, or IAM role).
    pub async fn new(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::with_client(Client::new(&config), bucket)
    }

    /// Custom endpoint for S3-compatible services like MinIO.
    pub async fn with_endpoint(
        bucket: impl Into<String>,
        endpoint: &str,
        region: Option<&str>,
    ) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            config_loader = config_loader.region(aws_config::Region::new(region.to_string()));
        }
        let config = config_loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Self::with_client(Client::from_conf(s3_config), bucket)
    }

    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn uri_for_key(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

/// S3-compatible endpoints do not all answer a missing key with `NoSuchKey`;
/// some only send a bare 404.
fn is_not_found(error: &SdkError<GetObjectError, HttpResponse>) -> bool {
    if matches!(error.as_service_error(), Some(GetObjectError::NoSuchKey(_))) {
        return true;
    }
    let status = error.raw_response().map(|response| response.status().as_u16());
    is_missing_object(error.code(), status)
}

fn is_missing_object(code: Option<&str>, status: Option<u16>) -> bool {
    matches!(code, Some("NoSuchKey" | "NotFound" | "404")) || status == Some(404)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ObjectStoreError> {
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if is_not_found(&e) => {
                debug!(uri = %self.uri_for_key(key), "No object stored yet");
                return Ok(None);
            }
            Err(e) => {
                return Err(ObjectStoreError::Backend(format!(
                    "S3 download of {} failed: {}",
                    self.uri_for_key(key),
                    e
                )));
            }
        };

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::Backend(format!("S3 body read failed: {}", e)))?
            .into_bytes()
            .to_vec();
        Ok(Some(bytes))
    }

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                ObjectStoreError::Backend(format!(
                    "S3 upload of {} failed: {}",
                    self.uri_for_key(key),
                    e
                ))
            })?;

        debug!(uri = %self.uri_for_key(key), size, "Stored object in S3");
        Ok(())
    }
}
