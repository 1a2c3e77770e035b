//! Messaging channel abstraction for the quiz funnel.
//!
//! Channels own the platform-specific halves of the conversation: decoding
//! inbound webhook payloads into the tagged [`UserEvent`](quizflow_core::UserEvent)
//! and rendering [`Reply`](quizflow_core::Reply) fragments back into
//! platform messages.
//!
//! # Main types
//!
//! - [`Channel`] — Trait for rendering replies on a platform.
//! - [`InboundEvent`] — A decoded event with its user and chat ids.
//! - [`TelegramChannel`] — Telegram Bot API adapter (webhook mode).

/// Core channel trait and inbound event type.
pub mod channel;
/// Telegram channel integration.
pub mod telegram;

pub use channel::{Channel, InboundEvent};
pub use telegram::{TelegramChannel, TelegramUpdate};
