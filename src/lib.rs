pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;
pub mod transcribe;

pub use config::Config;
pub use error::{SessionError, StorageError, TranscribeError};
pub use http::{create_router, AppState};
pub use session::{
    AudioIngressQueue, Inbound, ServerMessage, SessionConfig, SessionController, SessionState,
    TranscriptState, AUDIO_QUEUE_CAPACITY,
};
pub use storage::{Archiver, BlobStore, HttpBlobStore};
pub use transcribe::{
    StreamOptions, TranscriptEvent, TranscriptionBackend, TranscriptionStream,
    WsTranscriptionBackend,
};
