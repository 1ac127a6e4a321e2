use super::BlobStore;
use crate::error::StorageError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;

/// Upper bound on the persistence write. Deliberately independent of the
/// session's cancellation signal: the session is usually already torn
/// down by the time this runs, and a cancelled session must still be able
/// to flush its transcript.
const SAVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Serializes the accumulated transcript and writes it as a single text
/// object to durable storage.
pub struct Archiver {
    store: Arc<dyn BlobStore>,
    prefix: String,
}

impl Archiver {
    pub fn new(store: Arc<dyn BlobStore>, prefix: String) -> Self {
        Self { store, prefix }
    }

    /// Persist `full_text` under a timestamped key and return the key.
    ///
    /// Returns `Ok(None)` without contacting storage when the transcript
    /// is empty. Single best-effort attempt, no retry.
    pub async fn save(&self, full_text: &str) -> Result<Option<String>, StorageError> {
        if full_text.is_empty() {
            info!("no transcript to save");
            return Ok(None);
        }

        let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let key = format!("{}/transcription_{}.txt", self.prefix, timestamp);

        info!(%key, chars = full_text.len(), "saving transcript");

        let write = self
            .store
            .put(&key, full_text.as_bytes().to_vec(), "text/plain");
        match timeout(SAVE_TIMEOUT, write).await {
            Ok(Ok(())) => Ok(Some(key)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(StorageError::Timeout(SAVE_TIMEOUT.as_secs())),
        }
    }
}
