//! Event dispatch: routes decoded user events to the right session.
//!
//! The engine is the only writer of session state. It looks up (or
//! implicitly creates) the per-user [`ConversationSession`], applies the
//! event, persists the result through the store's compare-and-swap
//! protocol, and turns every per-event error into a user-facing reply —
//! the transport always has something to send.

/// The quiz engine.
pub mod engine;

pub use engine::QuizEngine;
