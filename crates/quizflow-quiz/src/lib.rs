//! Quiz configuration schema, validation, and tier resolution.
//!
//! A quiz is pure data: an ordered list of questions with scored options,
//! plus a contiguous set of score-range tiers mapped to result copy. The
//! same engine code consumes any number of deployed quiz variants; nothing
//! about a particular funnel is hardcoded.
//!
//! # Main types
//!
//! - [`QuizConfig`] — The full quiz definition, loaded once at startup.
//! - [`Question`] / [`AnswerOption`] — The scored question set.
//! - [`ResultTier`] — A score-range bucket with result narrative text.
//! - [`QuizOutcome`] — Totals plus the resolved tier for a finished quiz.
//! - [`ConfigError`] — Fatal load-time validation failures.

/// Quiz schema types and load-time validation.
pub mod schema;
/// Tier range resolution over a total score.
pub mod tiers;

pub use schema::{AnswerOption, ConfigError, Question, QuizConfig, ResultTier};
pub use tiers::QuizOutcome;
