use quizflow_core::{
    AnswerFeedback, QuestionPrompt, QuizflowError, QuizflowResult, Reply, SessionError, UserEvent,
};
use quizflow_quiz::QuizConfig;
use quizflow_report::ReportBackend;
use quizflow_session::{ConversationSession, Progress, SessionStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Routes inbound user events to the per-user session and produces replies.
pub struct QuizEngine {
    quiz: Arc<QuizConfig>,
    sessions: Arc<dyn SessionStore>,
    reporter: Arc<dyn ReportBackend>,
}

impl QuizEngine {
    /// Creates an engine over a validated quiz.
    ///
    /// Validation failures are fatal here; per-request code relies on the
    /// quiz being well-formed.
    pub fn new(
        quiz: QuizConfig,
        sessions: Arc<dyn SessionStore>,
        reporter: Arc<dyn ReportBackend>,
    ) -> QuizflowResult<Self> {
        quiz.validate()?;
        Ok(Self {
            quiz: Arc::new(quiz),
            sessions,
            reporter,
        })
    }

    /// The quiz this engine serves.
    pub fn quiz(&self) -> &QuizConfig {
        &self.quiz
    }

    /// Handles one decoded event for `user_id` and returns the replies to
    /// render, in order.
    ///
    /// Every session-state error is recovered into a reply; only store,
    /// report, and transport failures surface as `Err`.
    pub async fn handle_event(
        &self,
        user_id: &str,
        event: UserEvent,
    ) -> QuizflowResult<Vec<Reply>> {
        match event {
            UserEvent::Start => self.handle_start(user_id).await,
            UserEvent::Answer(option) => self.handle_answer(user_id, option).await,
            UserEvent::RequestResult => self.handle_request_result(user_id).await,
        }
    }

    async fn handle_start(&self, user_id: &str) -> QuizflowResult<Vec<Reply>> {
        // `start` always overwrites: an existing session keeps its version
        // counter so it still participates in conflict detection, but all
        // progress is discarded.
        let mut session = match self.sessions.get(user_id).await? {
            Some(existing) => existing,
            None => ConversationSession::new(user_id),
        };
        session.start();
        self.sessions.create(&session).await?;

        info!(user_id, quiz = %self.quiz.title, "Quiz started");

        let mut replies = Vec::new();
        if let Some(intro) = &self.quiz.intro {
            replies.push(Reply::notice(intro.clone()));
        }
        replies.push(self.prompt(&session));
        Ok(replies)
    }

    async fn handle_answer(&self, user_id: &str, option: usize) -> QuizflowResult<Vec<Reply>> {
        let Some(mut session) = self.sessions.get(user_id).await? else {
            // No active session: treat the event as an implicit start.
            info!(user_id, "Answer for unknown session, starting fresh");
            return self.handle_start(user_id).await;
        };

        match session.submit_answer(&self.quiz, option) {
            Ok(ack) => match self.sessions.update(&session).await {
                Ok(()) => {
                    info!(
                        user_id,
                        question = session.current_question,
                        running_score = ack.running_score,
                        "Answer recorded"
                    );
                    let mut replies = vec![Reply::Feedback(AnswerFeedback {
                        feedback: ack.feedback,
                        running_score: ack.running_score,
                        running_metric: ack.running_metric,
                        metric_unit: self.quiz.metric_unit.clone(),
                    })];
                    replies.push(self.prompt(&session));
                    Ok(replies)
                }
                Err(QuizflowError::Session(SessionError::Conflict)) => {
                    // Lost the CAS race (duplicate webhook delivery or a
                    // double-tap). The winner's advance stands; re-prompt
                    // from the stored state instead of double-counting.
                    warn!(user_id, "Concurrent session update, answer dropped");
                    let stored = self
                        .sessions
                        .get(user_id)
                        .await?
                        .unwrap_or_else(|| ConversationSession::new(user_id));
                    Ok(vec![
                        Reply::notice("That answer was already processed."),
                        self.prompt(&stored),
                    ])
                }
                Err(e) => Err(e),
            },
            Err(SessionError::OutOfRangeOption { option_count, .. }) => {
                warn!(user_id, option, option_count, "Option out of range");
                Ok(vec![
                    Reply::notice("Please pick one of the listed options."),
                    self.prompt(&session),
                ])
            }
            Err(SessionError::SessionComplete) => Ok(vec![Reply::notice(
                "You have answered every question. Send /result to see your report.",
            )]),
            // submit_answer produces no other variants.
            Err(e) => Err(e.into()),
        }
    }

    async fn handle_request_result(&self, user_id: &str) -> QuizflowResult<Vec<Reply>> {
        let Some(session) = self.sessions.get(user_id).await? else {
            info!(user_id, "Result request for unknown session, starting fresh");
            return self.handle_start(user_id).await;
        };

        match session.finalize(&self.quiz) {
            Ok(outcome) => {
                info!(
                    user_id,
                    score = outcome.total_score,
                    tier = %outcome.tier.label,
                    reporter = self.reporter.name(),
                    "Quiz finalized"
                );
                // The session stays stored and complete, so a repeated
                // result request renders the identical outcome.
                let text = self
                    .reporter
                    .render(&self.quiz, &outcome, &session.answers)
                    .await?;
                Ok(vec![Reply::Report { text }])
            }
            Err(SessionError::IncompleteSession { answered, total }) => {
                info!(user_id, answered, total, "Result requested early");
                Ok(vec![
                    Reply::notice(format!(
                        "You have answered {answered} of {total} questions so far."
                    )),
                    self.prompt(&session),
                ])
            }
            Err(e) => Err(e.into()),
        }
    }

    fn prompt(&self, session: &ConversationSession) -> Reply {
        match session.progress(&self.quiz) {
            Progress::Question { ordinal, question } => Reply::Question(QuestionPrompt {
                ordinal,
                total: self.quiz.question_count(),
                text: question.text.clone(),
                options: question.options.iter().map(|o| o.label.clone()).collect(),
            }),
            Progress::ReadyForResult => {
                Reply::notice("All questions answered! Send /result to see your report.")
            }
        }
    }
}
