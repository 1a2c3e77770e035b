use serde::{Deserialize, Serialize};

/// A single selectable option on a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Label shown to the user (button text).
    pub label: String,
    /// Score weight added to the total when this option is selected.
    pub score: u32,
    /// Secondary-metric weight (e.g. an "improvement amount") accumulated
    /// alongside the score.
    #[serde(default)]
    pub metric: f64,
    /// Feedback text sent immediately after selecting this option.
    #[serde(default)]
    pub feedback: Option<String>,
}

/// A question with its ordered options.
///
/// The ordinal position is the index within [`QuizConfig::questions`];
/// it is not stored redundantly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Prompt text shown to the user.
    pub text: String,
    /// Selectable options, in display order.
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Maximum score obtainable on this question.
    pub fn max_score(&self) -> u32 {
        self.options.iter().map(|o| o.score).max().unwrap_or(0)
    }
}

/// A labeled score-range bucket mapped to result copy.
///
/// Bounds are inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTier {
    /// Inclusive lower bound of the score range.
    pub min_score: u32,
    /// Inclusive upper bound of the score range.
    pub max_score: u32,
    /// Short tier label (e.g. "High potential").
    pub label: String,
    /// Narrative paragraph for the result message.
    pub narrative: String,
    /// Recommendation / call-to-action text.
    pub recommendation: String,
}

impl ResultTier {
    /// Whether `score` falls inside this tier's inclusive range.
    pub fn contains(&self, score: u32) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

/// The full definition of one deployed quiz funnel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Quiz title, used in logs and the default report.
    pub title: String,
    /// Intro message sent on `start`, before the first question.
    #[serde(default)]
    pub intro: Option<String>,
    /// Unit label for the secondary metric (e.g. "EUR/month").
    #[serde(default)]
    pub metric_unit: Option<String>,
    /// Ordered question set.
    pub questions: Vec<Question>,
    /// Score-range tiers; must be contiguous and cover `[0, max_score]`.
    pub tiers: Vec<ResultTier>,
}

/// Fatal quiz-configuration errors.
///
/// These are checked once at load time and must prevent the service from
/// starting; they are never produced per-request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The quiz TOML could not be parsed.
    #[error("failed to parse quiz config: {0}")]
    Parse(String),

    /// The quiz has no questions.
    #[error("quiz has no questions")]
    NoQuestions,

    /// A question has an empty option list.
    #[error("question {ordinal} has no options")]
    EmptyOptions {
        /// 1-based ordinal of the offending question.
        ordinal: usize,
    },

    /// The quiz has no result tiers.
    #[error("quiz has no result tiers")]
    NoTiers,

    /// A tier range has `min_score > max_score`.
    #[error("tier '{label}' has inverted range {min}..={max}")]
    InvertedRange {
        /// Tier label.
        label: String,
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },

    /// Tier ranges are not contiguous.
    #[error("tier ranges not contiguous: expected a range starting at {expected}, found {found}")]
    NonContiguousTiers {
        /// The next score a tier must start at.
        expected: u32,
        /// The lower bound actually found.
        found: u32,
    },

    /// Tier ranges do not cover the full reachable score range.
    #[error("tiers cover scores up to {covered} but the maximum possible score is {max_score}")]
    IncompleteCoverage {
        /// Highest score covered by the tiers.
        covered: u32,
        /// Maximum score reachable in the quiz.
        max_score: u32,
    },
}

impl QuizConfig {
    /// Parses a quiz from TOML and validates it.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let quiz: Self =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        quiz.validate()?;
        Ok(quiz)
    }

    /// Number of questions in the quiz.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Maximum possible total score: the sum of each question's best option.
    pub fn max_score(&self) -> u32 {
        self.questions.iter().map(Question::max_score).sum()
    }

    /// Validates the question set and tier ranges.
    ///
    /// Tier ranges must be contiguous and exhaustive over
    /// `[0, max_score]`. This runs once at load time; per-request code
    /// relies on it having passed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        for (i, q) in self.questions.iter().enumerate() {
            if q.options.is_empty() {
                return Err(ConfigError::EmptyOptions { ordinal: i + 1 });
            }
        }
        if self.tiers.is_empty() {
            return Err(ConfigError::NoTiers);
        }

        let mut sorted: Vec<&ResultTier> = self.tiers.iter().collect();
        sorted.sort_by_key(|t| t.min_score);

        let mut expected = 0u32;
        for tier in &sorted {
            if tier.min_score > tier.max_score {
                return Err(ConfigError::InvertedRange {
                    label: tier.label.clone(),
                    min: tier.min_score,
                    max: tier.max_score,
                });
            }
            if tier.min_score != expected {
                return Err(ConfigError::NonContiguousTiers {
                    expected,
                    found: tier.min_score,
                });
            }
            expected = tier.max_score.saturating_add(1);
        }

        let covered = expected.saturating_sub(1);
        if covered < self.max_score() {
            return Err(ConfigError::IncompleteCoverage {
                covered,
                max_score: self.max_score(),
            });
        }

        Ok(())
    }
}

impl From<ConfigError> for quizflow_core::QuizflowError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
