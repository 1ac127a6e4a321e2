use anyhow::{Context, Result};
use clap::Parser;
use dictation_relay::{create_router, AppState, Archiver, Config, HttpBlobStore, WsTranscriptionBackend};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "dictation-relay",
    about = "Relays live audio to a streaming transcription service and archives the transcript"
)]
struct Args {
    /// Path to a TOML config file (environment variables override it)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let cfg = Config::load(args.config.as_deref())?;

    info!("dictation-relay v0.1.0");
    info!("transcription service: {}", cfg.transcribe.url);
    info!("storage: {}/{}", cfg.storage.endpoint, cfg.storage.bucket);

    let backend = Arc::new(WsTranscriptionBackend::new(
        cfg.transcribe.url.clone(),
        cfg.transcribe.api_key.clone(),
    ));
    let store = Arc::new(HttpBlobStore::new(
        cfg.storage.endpoint.clone(),
        cfg.storage.bucket.clone(),
    ));
    let archiver = Arc::new(Archiver::new(store, cfg.storage.prefix.clone()));

    let addr = format!("{}:{}", cfg.service.bind, cfg.service.port);
    let state = AppState::new(cfg, backend, archiver);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
