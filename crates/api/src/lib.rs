//! HTTP API layer for tutorium.
//!
//! This crate provides the REST API and real-time messaging:
//!
//! - **Endpoints**: accounts, chats, messages and the course catalog under `/api`
//! - **Streaming**: topic subscriptions and message submission over WebSocket
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod streaming;

pub use endpoints::router;
pub use middleware::AppState;
pub use streaming::{ClientFrame, ServerFrame, StreamingState, streaming_handler};
