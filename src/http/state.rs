use crate::config::Config;
use crate::storage::Archiver;
use crate::transcribe::TranscriptionBackend;
use std::sync::Arc;

/// Shared application state for HTTP handlers. The backend and archiver
/// are trait objects so tests can swap in in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn TranscriptionBackend>,
    pub archiver: Arc<Archiver>,
}

impl AppState {
    pub fn new(
        config: Config,
        backend: Arc<dyn TranscriptionBackend>,
        archiver: Arc<Archiver>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            archiver,
        }
    }
}
