//! Result-report generation for finished quizzes.
//!
//! The engine hands a finalized [`QuizOutcome`] plus the per-question
//! answers to a [`ReportBackend`]; the backend turns it into the message
//! text sent back to the user. Two backends ship: static template
//! substitution and an OpenAI-compatible chat-completions call.
//!
//! To add a new backend: implement [`ReportBackend`] and wire it in
//! [`build_backend`].

/// OpenAI-compatible completion backend.
pub mod completion;
/// Report backend configuration.
pub mod config;
/// Static template-substitution backend.
pub mod template;

pub use completion::CompletionReporter;
pub use config::{ReportConfig, ReportProvider};
pub use template::TemplateReporter;

use quizflow_core::QuizflowResult;
use quizflow_quiz::{QuizConfig, QuizOutcome};
use quizflow_session::Answer;
use std::sync::Arc;

/// Renders the final report text for a completed quiz.
#[async_trait::async_trait]
pub trait ReportBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Produces the report body from the finalized outcome and the
    /// recorded answers. Must not mutate session state.
    async fn render(
        &self,
        quiz: &QuizConfig,
        outcome: &QuizOutcome,
        answers: &[Answer],
    ) -> QuizflowResult<String>;
}

/// Builds the configured report backend.
pub fn build_backend(config: ReportConfig) -> Arc<dyn ReportBackend> {
    match config.provider {
        ReportProvider::Template => Arc::new(TemplateReporter::new(config)),
        ReportProvider::OpenAi => Arc::new(CompletionReporter::new(config)),
    }
}
