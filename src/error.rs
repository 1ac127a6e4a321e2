use thiserror::Error;

/// Session-scoped failure taxonomy.
///
/// Every variant is local to one connection; sessions share no mutable
/// state, so no error here can affect other concurrent sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The client transport broke. Terminates the session, no retry.
    /// Outbound delivery is impossible at this point, but persistence of
    /// the accumulated transcript is still attempted.
    #[error("client connection error: {0}")]
    Connection(String),

    /// The recognition service failed to start or died mid-stream.
    /// Session-fatal: resuming would require replaying already-sent
    /// audio, which this design does not attempt.
    #[error("transcription service unavailable: {0}")]
    UpstreamUnavailable(#[from] TranscribeError),

    /// Persisting the transcript failed. Surfaced to the client once;
    /// the in-memory transcript is not re-attempted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures starting or running the upstream recognition stream.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("failed to connect to transcription service: {0}")]
    Connect(String),

    #[error("transcription service rejected the stream request: {0}")]
    Handshake(String),

    #[error("transcription stream failed: {0}")]
    Stream(String),
}

/// Failures writing to the blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(String),

    #[error("storage responded with status {0}")]
    Status(u16),

    #[error("storage write timed out after {0}s")]
    Timeout(u64),
}
