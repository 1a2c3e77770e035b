use crate::schema::{QuizConfig, ResultTier};
use serde::{Deserialize, Serialize};

/// The finalized outcome of a completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// Sum of the selected options' scores over all questions.
    pub total_score: u32,
    /// Sum of the selected options' secondary-metric weights.
    pub total_metric: f64,
    /// The tier whose range contains `total_score`.
    pub tier: ResultTier,
}

impl QuizConfig {
    /// Resolves the tier whose range contains `total_score`.
    ///
    /// Tiers are scanned in descending `min_score` order and the first
    /// containing range wins. Validation guarantees totality over
    /// `[0, max_score]`; if a misconfigured score slips through anyway the
    /// lowest tier acts as the fallback. Returns `None` only when the quiz
    /// has no tiers at all, a state `validate` rejects.
    pub fn resolve_tier(&self, total_score: u32) -> Option<&ResultTier> {
        let mut sorted: Vec<&ResultTier> = self.tiers.iter().collect();
        sorted.sort_by(|a, b| b.min_score.cmp(&a.min_score));

        sorted
            .iter()
            .find(|t| t.contains(total_score))
            .or_else(|| sorted.last())
            .copied()
    }
}
