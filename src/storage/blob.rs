use crate::error::StorageError;
use async_trait::async_trait;
use tracing::debug;

/// Opaque key/value blob store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;
}

/// Blob store over a plain HTTP object endpoint: `PUT {endpoint}/{bucket}/{key}`.
pub struct HttpBlobStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
}

impl HttpBlobStore {
    pub fn new(endpoint: String, bucket: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            bucket,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let url = format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            key
        );
        debug!(%url, bytes = bytes.len(), "uploading object");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}
