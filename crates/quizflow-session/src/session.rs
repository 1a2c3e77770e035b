use chrono::{DateTime, Utc};
use quizflow_core::SessionError;
use quizflow_quiz::{Question, QuizConfig, QuizOutcome};
use serde::{Deserialize, Serialize};

/// One recorded answer. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// 1-based ordinal of the answered question.
    pub question: usize,
    /// Index of the selected option.
    pub option: usize,
    /// Score weight of the selected option at selection time.
    pub score: u32,
    /// Secondary-metric weight of the selected option at selection time.
    pub metric: f64,
    /// Feedback text attached to the selected option, if any.
    pub feedback: Option<String>,
    /// When the answer was recorded.
    pub answered_at: DateTime<Utc>,
}

/// Returned by [`ConversationSession::submit_answer`] on success.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerAck {
    /// Feedback for the chosen option, if configured.
    pub feedback: Option<String>,
    /// Running score total over all recorded answers.
    pub running_score: u32,
    /// Running secondary-metric total over all recorded answers.
    pub running_metric: f64,
}

/// Where the session currently stands in the quiz.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// The question at the current pointer, with its 1-based ordinal.
    Question {
        /// 1-based ordinal of the question to prompt.
        ordinal: usize,
        /// The question definition.
        question: &'a Question,
    },
    /// All questions answered; the session is ready to finalize.
    ReadyForResult,
}

/// Per-user quiz progress.
///
/// The pointer invariant holds at all times:
/// `answers.len() == current_question` and
/// `0 <= current_question <= question_count`. Totals are always recomputed
/// from the answers list, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    /// Stable user identifier; the store key.
    pub user_id: String,
    /// Recorded answers; index = question ordinal − 1.
    pub answers: Vec<Answer>,
    /// Pointer to the next unanswered question (0-based). Equal to the
    /// question count once the quiz is complete.
    pub current_question: usize,
    /// When the quiz was (re)started.
    pub started_at: DateTime<Utc>,
    /// Store version counter for compare-and-swap updates.
    pub version: u64,
}

impl ConversationSession {
    /// Creates a fresh session for `user_id`, positioned at question 1.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            answers: Vec::new(),
            current_question: 0,
            started_at: Utc::now(),
            version: 0,
        }
    }

    /// Restarts the quiz, discarding all recorded answers.
    ///
    /// Always succeeds, from any state. The store version is kept so a
    /// restart still participates in conflict detection.
    pub fn start(&mut self) {
        self.answers.clear();
        self.current_question = 0;
        self.started_at = Utc::now();
    }

    /// The question to prompt next, or `ReadyForResult` once all are
    /// answered. No side effects.
    pub fn progress<'a>(&self, quiz: &'a QuizConfig) -> Progress<'a> {
        match quiz.questions.get(self.current_question) {
            Some(question) => Progress::Question {
                ordinal: self.current_question + 1,
                question,
            },
            None => Progress::ReadyForResult,
        }
    }

    /// Whether every question has been answered.
    pub fn is_complete(&self, quiz: &QuizConfig) -> bool {
        self.current_question >= quiz.question_count()
    }

    /// Records an answer for the current question and advances the pointer.
    ///
    /// Fails with [`SessionError::SessionComplete`] once all questions are
    /// answered and with [`SessionError::OutOfRangeOption`] for an invalid
    /// option index; in both cases the session is left unchanged.
    pub fn submit_answer(
        &mut self,
        quiz: &QuizConfig,
        option_index: usize,
    ) -> Result<AnswerAck, SessionError> {
        let question = quiz
            .questions
            .get(self.current_question)
            .ok_or(SessionError::SessionComplete)?;

        let option = question
            .options
            .get(option_index)
            .ok_or(SessionError::OutOfRangeOption {
                index: option_index,
                option_count: question.options.len(),
            })?;

        self.answers.push(Answer {
            question: self.current_question + 1,
            option: option_index,
            score: option.score,
            metric: option.metric,
            feedback: option.feedback.clone(),
            answered_at: Utc::now(),
        });
        self.current_question += 1;

        Ok(AnswerAck {
            feedback: option.feedback.clone(),
            running_score: self.total_score(),
            running_metric: self.total_metric(),
        })
    }

    /// Sum of all recorded answers' scores.
    pub fn total_score(&self) -> u32 {
        self.answers.iter().map(|a| a.score).sum()
    }

    /// Sum of all recorded answers' secondary-metric weights.
    pub fn total_metric(&self) -> f64 {
        self.answers.iter().map(|a| a.metric).sum()
    }

    /// Computes the final outcome: totals plus the resolved tier.
    ///
    /// Pure with respect to session data and idempotent; fails with
    /// [`SessionError::IncompleteSession`] before all questions are
    /// answered, or [`SessionError::MisconfiguredQuiz`] if the quiz has
    /// no tiers to resolve against.
    pub fn finalize(&self, quiz: &QuizConfig) -> Result<QuizOutcome, SessionError> {
        if !self.is_complete(quiz) {
            return Err(SessionError::IncompleteSession {
                answered: self.answers.len(),
                total: quiz.question_count(),
            });
        }

        let total_score = self.total_score();
        let tier = quiz
            .resolve_tier(total_score)
            .ok_or(SessionError::MisconfiguredQuiz)?
            .clone();
        Ok(QuizOutcome {
            total_score,
            total_metric: self.total_metric(),
            tier,
        })
    }
}
