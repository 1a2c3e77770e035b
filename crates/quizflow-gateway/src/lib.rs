//! HTTP gateway: the webhook entry point for messaging platforms.
//!
//! Exposes `POST /webhook/telegram` for Telegram update delivery and
//! `GET /health` for liveness checks. The webhook handler authenticates
//! the platform's secret token, decodes the update, dispatches it through
//! the engine, and sends the replies back over the channel. Per-event
//! failures are logged and acknowledged with 200 so the platform does not
//! retry-storm; only a secret mismatch is rejected. When the engine itself
//! fails the user still receives an apology notice, never silence.

/// Router construction and shared state.
pub mod server;
/// Webhook handler and secret validation.
pub mod webhook;

pub use server::{AppState, GatewayServer};
pub use webhook::{validate_secret, ENGINE_ERROR_NOTICE};
