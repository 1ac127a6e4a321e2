use super::{StreamOptions, TranscriptEvent, TranscriptionBackend, TranscriptionStream};
use crate::error::TranscribeError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

const AUDIO_CHANNEL_CAPACITY: usize = 100;
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Stream start request, sent as the first text frame after connecting.
#[derive(Serialize)]
struct StartRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
    language_code: &'a str,
    specialty: &'a str,
    #[serde(rename = "type")]
    transcription_type: &'a str,
    media_encoding: &'a str,
    media_sample_rate_hz: u32,
    number_of_channels: u16,
    enable_channel_identification: bool,
}

#[derive(Debug, Deserialize)]
struct ResultMessage {
    #[serde(default)]
    results: Vec<RecognitionResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    is_partial: bool,
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
}

/// WebSocket client for the streaming recognition service.
///
/// Protocol: one JSON start request, then binary PCM frames terminated by
/// a single empty binary frame; the service answers with JSON result
/// messages carrying ranked alternatives, of which only the top one is
/// used.
pub struct WsTranscriptionBackend {
    url: String,
    api_key: Option<String>,
}

impl WsTranscriptionBackend {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self { url, api_key }
    }
}

#[async_trait]
impl TranscriptionBackend for WsTranscriptionBackend {
    async fn start_stream(
        &self,
        opts: &StreamOptions,
    ) -> Result<TranscriptionStream, TranscribeError> {
        let (ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TranscribeError::Connect(e.to_string()))?;
        let (mut sink, mut stream) = ws.split();

        let start = StartRequest {
            api_key: self.api_key.as_deref(),
            language_code: &opts.language,
            specialty: &opts.specialty,
            transcription_type: &opts.transcription_type,
            media_encoding: "pcm_s16le",
            media_sample_rate_hz: opts.sample_rate_hz,
            number_of_channels: opts.channels,
            enable_channel_identification: opts.channels > 1,
        };
        let payload = serde_json::to_string(&start)
            .map_err(|e| TranscribeError::Handshake(e.to_string()))?;
        sink.send(Message::Text(payload.into()))
            .await
            .map_err(|e| TranscribeError::Handshake(e.to_string()))?;

        info!(url = %self.url, language = %opts.language, "transcription stream started");

        let (audio_tx, mut audio_rx) = mpsc::channel::<Vec<u8>>(AUDIO_CHANNEL_CAPACITY);
        let (event_tx, event_rx) =
            mpsc::channel::<Result<TranscriptEvent, TranscribeError>>(EVENT_CHANNEL_CAPACITY);

        // Audio writer: forwards chunks until the empty end-of-stream
        // marker, then closes the write half.
        tokio::spawn(async move {
            while let Some(chunk) = audio_rx.recv().await {
                let end_of_stream = chunk.is_empty();
                if let Err(e) = sink.send(Message::Binary(chunk)).await {
                    warn!(error = %e, "failed to send audio chunk upstream");
                    break;
                }
                if end_of_stream {
                    debug!("sent end-of-stream marker upstream");
                    break;
                }
            }
            if let Err(e) = sink.close().await {
                debug!(error = %e, "error closing upstream write half");
            }
        });

        // Event reader: maps service result messages to transcript events.
        // A mid-stream failure is delivered as one `Err` item; in every
        // case dropping `event_tx` closes the channel, which the session
        // observes as end of stream.
        tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        let parsed: ResultMessage = match serde_json::from_str(&text) {
                            Ok(parsed) => parsed,
                            Err(e) => {
                                warn!(error = %e, "unparseable message from transcription service");
                                continue;
                            }
                        };
                        if let Some(message) = parsed.error {
                            error!(error = %message, "transcription service reported an error");
                            let _ = event_tx.send(Err(TranscribeError::Stream(message))).await;
                            break;
                        }
                        for result in parsed.results {
                            let Some(alternative) = result.alternatives.first() else {
                                continue;
                            };
                            let text = alternative.transcript.clone();
                            if text.is_empty() {
                                continue;
                            }
                            let event = if result.is_partial {
                                TranscriptEvent::Partial(text)
                            } else {
                                TranscriptEvent::Final(text)
                            };
                            if event_tx.send(Ok(event)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("transcription service closed the stream");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "transcription stream error");
                        let _ = event_tx
                            .send(Err(TranscribeError::Stream(e.to_string())))
                            .await;
                        break;
                    }
                }
            }
        });

        Ok(TranscriptionStream {
            audio: audio_tx,
            events: event_rx,
        })
    }
}
