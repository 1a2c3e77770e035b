//! Core types and error definitions for the Quizflow framework.
//!
//! This crate provides the foundational types shared across all Quizflow
//! crates: the unified error enum, the typed session-state errors, the
//! tagged inbound user event, and the outbound reply variants rendered by
//! messaging channels.
//!
//! # Main types
//!
//! - [`QuizflowError`] — Unified error enum for all Quizflow subsystems.
//! - [`QuizflowResult`] — Convenience alias for `Result<T, QuizflowError>`.
//! - [`SessionError`] — Typed, locally recoverable session-state errors.
//! - [`UserEvent`] — A decoded inbound event (`Start`, `Answer`, `RequestResult`).
//! - [`Reply`] — An outbound reply fragment for a channel to render.

use serde::{Deserialize, Serialize};

// --- Error types ---

/// Top-level error type for the Quizflow framework.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum QuizflowError {
    /// A session-state error (invalid option, premature finalize, lost CAS race).
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// An error in quiz configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from a messaging channel (e.g. Telegram API call).
    #[error("Channel error: {0}")]
    Channel(String),

    /// An error from the webhook gateway layer.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// An error while generating the result report.
    #[error("Report error: {0}")]
    Report(String),

    /// An error from an outbound HTTP request (e.g. completion API call).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`QuizflowError`].
pub type QuizflowResult<T> = Result<T, QuizflowError>;

/// Session-state errors.
///
/// All of these are recovered locally by the engine into a user-facing
/// reply; none propagate as unhandled faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The selected option index is not valid for the current question.
    /// The session is left unchanged.
    #[error("option {index} is out of range (question has {option_count} options)")]
    OutOfRangeOption {
        /// The index the user selected.
        index: usize,
        /// Number of options on the current question.
        option_count: usize,
    },

    /// An answer was submitted after all questions were answered.
    #[error("all questions are already answered")]
    SessionComplete,

    /// A result was requested before all questions were answered.
    #[error("quiz incomplete: {answered} of {total} questions answered")]
    IncompleteSession {
        /// Questions answered so far.
        answered: usize,
        /// Total questions in the quiz.
        total: usize,
    },

    /// A concurrent update won the compare-and-swap race for this session.
    #[error("session was modified concurrently")]
    Conflict,

    /// The quiz has no result tiers. Only reachable when finalizing
    /// against a quiz that skipped load-time validation.
    #[error("quiz has no result tiers configured")]
    MisconfiguredQuiz,
}

// --- Event types ---

/// A decoded inbound user event.
///
/// Channels translate platform-specific payloads (text commands, callback
/// data) into this tagged variant; the engine dispatches on it with an
/// exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UserEvent {
    /// Begin (or restart) the quiz, discarding any prior session.
    Start,
    /// The user selected an option for the current question.
    Answer(usize),
    /// The user asked for the final result.
    RequestResult,
}

// --- Reply types ---

/// A question prompt to render, including its selectable options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPrompt {
    /// 1-based position of the question within the quiz.
    pub ordinal: usize,
    /// Total number of questions in the quiz.
    pub total: usize,
    /// The question text.
    pub text: String,
    /// Option labels, in selection order.
    pub options: Vec<String>,
}

/// Immediate feedback after a recorded answer, with running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    /// Feedback text attached to the chosen option, if any.
    pub feedback: Option<String>,
    /// Sum of scores over all answers recorded so far.
    pub running_score: u32,
    /// Sum of secondary-metric weights over all answers recorded so far.
    pub running_metric: f64,
    /// Unit label for the secondary metric (e.g. a currency), if configured.
    pub metric_unit: Option<String>,
}

/// An outbound reply fragment.
///
/// One inbound event may produce several fragments (e.g. feedback followed
/// by the next question); the channel renders each in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    /// Prompt the user with a question and its options.
    Question(QuestionPrompt),
    /// Acknowledge a recorded answer.
    Feedback(AnswerFeedback),
    /// The final generated report text.
    Report {
        /// Rendered report body.
        text: String,
    },
    /// A plain informational message (intro, nudge, re-prompt hint).
    Notice {
        /// Message body.
        text: String,
    },
}

impl Reply {
    /// Creates a [`Reply::Notice`] from any string-like value.
    pub fn notice(text: impl Into<String>) -> Self {
        Self::Notice { text: text.into() }
    }
}
