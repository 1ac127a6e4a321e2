//! HTTP surface of the relay
//!
//! - GET /health - Health check
//! - GET /ws/dictation - WebSocket session endpoint; optional `specialty`
//!   and `type` query parameters override the configured defaults

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
