use crate::config::TranscribeConfig;
use crate::transcribe::StreamOptions;
use serde::{Deserialize, Serialize};

/// Per-connection transcription settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier, used in logs.
    pub session_id: String,

    /// Recognition language code (e.g. "en-US").
    pub language: String,

    /// Domain/specialty hint for the recognition service.
    pub specialty: String,

    /// Recognition mode (e.g. "DICTATION" vs "CONVERSATION").
    pub transcription_type: String,

    /// Sample rate of the inbound PCM audio.
    pub sample_rate_hz: u32,

    /// Channel count of the inbound PCM audio.
    pub channels: u16,
}

impl SessionConfig {
    /// Build a session config from the service defaults, applying the
    /// per-connection query-string overrides where present.
    pub fn from_service(
        cfg: &TranscribeConfig,
        specialty: Option<String>,
        transcription_type: Option<String>,
    ) -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            language: cfg.language.clone(),
            specialty: specialty.unwrap_or_else(|| cfg.specialty.clone()),
            transcription_type: transcription_type
                .unwrap_or_else(|| cfg.transcription_type.clone()),
            sample_rate_hz: cfg.sample_rate_hz,
            channels: cfg.channels,
        }
    }

    pub fn stream_options(&self) -> StreamOptions {
        StreamOptions {
            language: self.language.clone(),
            specialty: self.specialty.clone(),
            transcription_type: self.transcription_type.clone(),
            sample_rate_hz: self.sample_rate_hz,
            channels: self.channels,
        }
    }
}
