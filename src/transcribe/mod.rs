//! Streaming transcription client
//!
//! Bridges encoded audio to the external recognition service and surfaces
//! its event stream. The service is opaque beyond this contract: audio
//! chunks in, time-ordered partial/final text events out.

mod ws;

pub use ws::WsTranscriptionBackend;

use crate::error::TranscribeError;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One hypothesis from the recognition service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Interim hypothesis, superseded by the next partial or final.
    Partial(String),
    /// Completed hypothesis for an utterance. May restate or extend an
    /// earlier final; the session reconciler filters that.
    Final(String),
}

/// Options for one recognition stream.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    pub language: String,
    pub specialty: String,
    pub transcription_type: String,
    pub sample_rate_hz: u32,
    pub channels: u16,
}

/// Live duplex recognition stream.
///
/// Raw PCM chunks go into `audio`. An empty chunk is the end-of-stream
/// marker and must be sent exactly once; no further sends are permitted
/// after it. `events` yields hypotheses in service order; a mid-stream
/// failure is delivered as one `Err` item, after which the channel
/// closes. Normal end of stream is a plain close with no `Err`.
pub struct TranscriptionStream {
    pub audio: mpsc::Sender<Vec<u8>>,
    pub events: mpsc::Receiver<Result<TranscriptEvent, TranscribeError>>,
}

/// Seam to the external recognition service, swappable in tests.
///
/// Failures after a successful start are not retried in this layer:
/// mid-stream reconnection would require replaying already-sent audio, so
/// they surface as one `Err` item on the event channel before it closes.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    async fn start_stream(
        &self,
        opts: &StreamOptions,
    ) -> Result<TranscriptionStream, TranscribeError>;
}
