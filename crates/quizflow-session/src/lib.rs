//! Per-user conversation sessions and their keyed store.
//!
//! A [`ConversationSession`] tracks one user's progress through an ordered
//! quiz: which question they are on, what they have answered, and the
//! recomputed score/metric totals. The [`SessionStore`] trait is the
//! persistence collaborator: a keyed map with per-key optimistic
//! concurrency so webhook retries can never double-count an answer.

/// The conversation state machine.
pub mod session;
/// Keyed session stores with compare-and-swap updates.
pub mod store;

pub use session::{Answer, AnswerAck, ConversationSession, Progress};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
