use super::state::AppState;
use crate::error::SessionError;
use crate::session::{Inbound, ServerMessage, SessionConfig, SessionController};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const INBOUND_CHANNEL_CAPACITY: usize = 64;
const OUTBOUND_CHANNEL_CAPACITY: usize = 64;

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Per-connection overrides for the recognition stream.
#[derive(Debug, Deserialize)]
pub struct SessionParams {
    pub specialty: Option<String>,
    #[serde(rename = "type")]
    pub transcription_type: Option<String>,
}

/// GET /ws/dictation
/// Upgrades to the dictation session protocol: binary frames carry PCM
/// audio, text frames carry control messages, and the server streams
/// partial/final/saved/error messages back.
pub async fn dictation_ws(
    ws: WebSocketUpgrade,
    Query(params): Query<SessionParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = run_session(socket, params, state).await {
            warn!(error = %e, "session ended with error");
        }
    })
}

/// Adapts the websocket to the controller's channel interface: one reader
/// loop classifying frames, and one writer task so every outbound message
/// goes through a single serialization point.
async fn run_session(
    socket: WebSocket,
    params: SessionParams,
    state: AppState,
) -> Result<(), SessionError> {
    info!("websocket connection established");

    let session_config = SessionConfig::from_service(
        &state.config.transcribe,
        params.specialty,
        params.transcription_type,
    );

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (in_tx, in_rx) = mpsc::channel::<Inbound>(INBOUND_CHANNEL_CAPACITY);
    let (out_tx, mut out_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_CHANNEL_CAPACITY);

    let writer = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    error!(error = %e, "failed to serialize outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let controller =
        SessionController::new(session_config, state.backend.clone(), state.archiver.clone());
    let session = tokio::spawn(controller.run(in_rx, out_tx));

    let mut read_error = None;
    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(Message::Binary(data)) => {
                if in_tx.send(Inbound::Audio(data)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Text(text)) => {
                if in_tx.send(Inbound::Text(text)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                debug!("client closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                read_error = Some(e.to_string());
                break;
            }
        }
    }

    // Dropping the inbound sender tells the controller the client is
    // gone; it drains, archives, and releases the outbound channel, which
    // in turn ends the writer.
    drop(in_tx);

    let result = match session.await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "session task panicked");
            Ok(())
        }
    };

    if let Err(e) = writer.await {
        error!(error = %e, "writer task panicked");
    }

    match read_error {
        Some(e) => Err(SessionError::Connection(e)),
        None => result,
    }
}
