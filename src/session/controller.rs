use super::config::SessionConfig;
use super::messages::{ClientMessage, ControlAction, Inbound, ServerMessage};
use super::queue::AudioIngressQueue;
use super::reconciler::TranscriptState;
use crate::error::{SessionError, TranscribeError};
use crate::storage::Archiver;
use crate::transcribe::{TranscriptEvent, TranscriptionBackend, TranscriptionStream};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, error, info, warn};

/// Lifecycle phase of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Starting,
    Active,
    Draining,
    Closed,
}

/// Owns one client connection from accept to close: wires the audio
/// ingress queue into the recognition stream, relays transcript events
/// back out, watches for the stop command, and drives teardown and
/// persistence.
///
/// The controller is transport-agnostic: it consumes classified inbound
/// frames from a channel and emits [`ServerMessage`]s into a channel
/// drained by a single connection writer, so all outbound writes are
/// serialized in one place.
pub struct SessionController {
    config: SessionConfig,
    backend: Arc<dyn TranscriptionBackend>,
    archiver: Arc<Archiver>,
    transcript: Arc<Mutex<TranscriptState>>,
    state: SessionState,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        backend: Arc<dyn TranscriptionBackend>,
        archiver: Arc<Archiver>,
    ) -> Self {
        Self {
            config,
            backend,
            archiver,
            transcript: Arc::new(Mutex::new(TranscriptState::new())),
            state: SessionState::Starting,
        }
    }

    /// Run the session to completion.
    ///
    /// Returns when the client disconnects, sends a stop command, or the
    /// recognition stream ends. On every termination path the accumulated
    /// transcript is archived before the session closes.
    pub async fn run(
        mut self,
        mut inbound: mpsc::Receiver<Inbound>,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Result<(), SessionError> {
        info!(
            session_id = %self.config.session_id,
            specialty = %self.config.specialty,
            transcription_type = %self.config.transcription_type,
            "session starting"
        );

        let stream = match self.backend.start_stream(&self.config.stream_options()).await {
            Ok(stream) => stream,
            Err(e) => {
                error!(
                    session_id = %self.config.session_id,
                    error = %e,
                    "failed to start transcription stream"
                );
                let _ = outbound
                    .send(ServerMessage::Error {
                        text: "Failed to start transcription".to_string(),
                    })
                    .await;
                self.transition(SessionState::Closed);
                return Err(e.into());
            }
        };
        let TranscriptionStream { audio, events } = stream;

        self.transition(SessionState::Active);

        let (queue, queue_rx) = AudioIngressQueue::new();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let forward = tokio::spawn(forward_audio(queue_rx, audio, cancel_rx.clone()));
        let mut relay = tokio::spawn(relay_events(
            events,
            Arc::clone(&self.transcript),
            outbound.clone(),
            cancel_rx,
        ));
        let mut relay_done = false;
        let mut upstream_error = None;

        // Active phase: relay audio in, watch for stop, and notice the
        // recognition stream ending on its own. Any of the three exits
        // the loop.
        loop {
            tokio::select! {
                frame = inbound.recv() => {
                    match frame {
                        Some(Inbound::Audio(frame)) => {
                            if !queue.push(frame) {
                                warn!(
                                    session_id = %self.config.session_id,
                                    "audio queue full, dropping frame"
                                );
                            }
                        }
                        Some(Inbound::Text(text)) => {
                            match serde_json::from_str::<ClientMessage>(&text) {
                                Ok(ClientMessage::Control { action: ControlAction::Stop }) => {
                                    info!(session_id = %self.config.session_id, "received stop command");
                                    break;
                                }
                                Err(e) => {
                                    // Malformed control frames don't kill the session.
                                    warn!(
                                        session_id = %self.config.session_id,
                                        error = %e,
                                        "ignoring malformed control message"
                                    );
                                }
                            }
                        }
                        None => {
                            debug!(session_id = %self.config.session_id, "client connection closed");
                            break;
                        }
                    }
                }
                joined = &mut relay, if !relay_done => {
                    relay_done = true;
                    match joined {
                        Ok(failure) => upstream_error = failure,
                        Err(e) => {
                            error!(session_id = %self.config.session_id, error = %e, "event relay task panicked");
                        }
                    }
                    info!(session_id = %self.config.session_id, "transcription stream ended");
                    break;
                }
            }
        }

        self.transition(SessionState::Draining);

        // Closing the queue lets the forwarder emit the end-of-stream
        // marker; the cancellation signal stops whatever is still in
        // flight.
        queue.close();
        let _ = cancel_tx.send(true);

        if let Err(e) = forward.await {
            error!(session_id = %self.config.session_id, error = %e, "audio forward task panicked");
        }
        if !relay_done {
            match relay.await {
                Ok(failure) => upstream_error = failure,
                Err(e) => {
                    error!(session_id = %self.config.session_id, error = %e, "event relay task panicked");
                }
            }
        }

        // Persist whatever was accepted. Runs even when the stream broke
        // mid-session; if the client is already gone the notification
        // send fails quietly, but the write still happens.
        let archive_result = self.archive(&outbound).await;

        self.transition(SessionState::Closed);
        info!(session_id = %self.config.session_id, "session closed");
        match upstream_error {
            Some(e) => Err(e.into()),
            None => archive_result,
        }
    }

    async fn archive(&self, outbound: &mpsc::Sender<ServerMessage>) -> Result<(), SessionError> {
        let full_text = {
            let transcript = self.transcript.lock().await;
            debug!(
                session_id = %self.config.session_id,
                segments = transcript.segment_count(),
                "collecting transcript for archive"
            );
            transcript.joined()
        };

        match self.archiver.save(&full_text).await {
            Ok(Some(key)) => {
                info!(session_id = %self.config.session_id, %key, "transcript archived");
                let _ = outbound.send(ServerMessage::Saved { key }).await;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                error!(session_id = %self.config.session_id, error = %e, "failed to archive transcript");
                let _ = outbound
                    .send(ServerMessage::Error {
                        text: "Failed to save transcription".to_string(),
                    })
                    .await;
                Err(e.into())
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(
            session_id = %self.config.session_id,
            from = ?self.state,
            to = ?next,
            "session state change"
        );
        self.state = next;
    }
}

/// Drains the ingress queue into the recognition stream. When the queue
/// closes, sends the empty end-of-stream marker exactly once.
async fn forward_audio(
    mut queue_rx: mpsc::Receiver<Vec<u8>>,
    audio: mpsc::Sender<Vec<u8>>,
    mut cancel: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            frame = queue_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if audio.send(frame).await.is_err() {
                            debug!("recognition stream gone, stopping audio forward");
                            return;
                        }
                    }
                    None => {
                        if audio.send(Vec::new()).await.is_err() {
                            debug!("recognition stream gone before end-of-stream marker");
                        }
                        return;
                    }
                }
            }
            _ = cancel.changed() => {
                // Cancelled mid-stream; still terminate the upstream
                // stream cleanly so the service can flush pending finals.
                let _ = audio.send(Vec::new()).await;
                return;
            }
        }
    }
}

/// Relays recognition events to the client, reconciling finals so each
/// utterance is delivered at most once. Exits when the event stream
/// closes, the client channel closes, or cancellation fires. A mid-stream
/// failure is surfaced to the client as one error message and returned to
/// the controller.
async fn relay_events(
    mut events: mpsc::Receiver<Result<TranscriptEvent, TranscribeError>>,
    transcript: Arc<Mutex<TranscriptState>>,
    outbound: mpsc::Sender<ServerMessage>,
    mut cancel: watch::Receiver<bool>,
) -> Option<TranscribeError> {
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    debug!("recognition event stream closed");
                    return None;
                };
                match event {
                    Ok(TranscriptEvent::Partial(text)) => {
                        if outbound.send(ServerMessage::Partial { text }).await.is_err() {
                            return None;
                        }
                    }
                    Ok(TranscriptEvent::Final(text)) => {
                        info!(text = %text, "received final transcript");
                        // Compare-and-append under one lock so two finals
                        // can't race on the reconciler state.
                        let accepted = {
                            let mut transcript = transcript.lock().await;
                            transcript.accept_final(&text)
                        };
                        if let Some(text) = accepted {
                            if outbound.send(ServerMessage::Final { text }).await.is_err() {
                                return None;
                            }
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "transcription stream failed mid-session");
                        let _ = outbound
                            .send(ServerMessage::Error {
                                text: "Transcription stream failed".to_string(),
                            })
                            .await;
                        return Some(e);
                    }
                }
            }
            _ = cancel.changed() => {
                debug!("event relay cancelled");
                return None;
            }
        }
    }
}
