use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub transcribe: TranscribeConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub bind: String,
    pub port: u16,
}

/// Settings for the upstream recognition service. `specialty` and
/// `transcription_type` are defaults; clients can override them per
/// connection through query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub language: String,
    pub specialty: String,
    pub transcription_type: String,
    pub sample_rate_hz: u32,
    pub channels: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub prefix: String,
}

impl Config {
    /// Load configuration from an optional TOML file, with environment
    /// variables (`DICTATION_SECTION__KEY`) overriding file values.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("service.bind", "0.0.0.0")?
            .set_default("service.port", 8000)?
            .set_default("transcribe.url", "ws://localhost:9090/stream")?
            .set_default("transcribe.language", "en-US")?
            .set_default("transcribe.specialty", "PRIMARYCARE")?
            .set_default("transcribe.transcription_type", "DICTATION")?
            .set_default("transcribe.sample_rate_hz", 16000)?
            .set_default("transcribe.channels", 2)?
            .set_default("storage.endpoint", "http://localhost:9000")?
            .set_default("storage.bucket", "transcriptions")?
            .set_default("storage.prefix", "medical-transcriptions")?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("DICTATION").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
