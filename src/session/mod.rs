//! Per-connection session management
//!
//! This module owns the live dictation session: the bounded audio ingress
//! queue, the transcript reconciliation state, the wire message types, and
//! the controller that ties them to the recognition stream and archiver.

mod config;
mod controller;
mod messages;
mod queue;
mod reconciler;

pub use config::SessionConfig;
pub use controller::{SessionController, SessionState};
pub use messages::{ClientMessage, ControlAction, Inbound, ServerMessage};
pub use queue::{AudioIngressQueue, AUDIO_QUEUE_CAPACITY};
pub use reconciler::TranscriptState;
