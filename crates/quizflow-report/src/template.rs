use crate::config::ReportConfig;
use crate::ReportBackend;
use quizflow_core::QuizflowResult;
use quizflow_quiz::{QuizConfig, QuizOutcome};
use quizflow_session::Answer;

const DEFAULT_TEMPLATE: &str = "\
{{tier}} — {{score}} points

{{narrative}}

Estimated improvement potential: {{metric}} {{metric_unit}}

{{recommendation}}";

/// Static template-substitution reporter.
pub struct TemplateReporter {
    config: ReportConfig,
}

impl TemplateReporter {
    /// Creates a reporter from the report configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }
}

/// Replaces the report placeholders in `template` with outcome values.
pub fn render_template(template: &str, quiz: &QuizConfig, outcome: &QuizOutcome) -> String {
    template
        .replace("{{score}}", &outcome.total_score.to_string())
        .replace("{{metric}}", &format!("{:.0}", outcome.total_metric))
        .replace(
            "{{metric_unit}}",
            quiz.metric_unit.as_deref().unwrap_or_default(),
        )
        .replace("{{tier}}", &outcome.tier.label)
        .replace("{{narrative}}", &outcome.tier.narrative)
        .replace("{{recommendation}}", &outcome.tier.recommendation)
}

#[async_trait::async_trait]
impl ReportBackend for TemplateReporter {
    fn name(&self) -> &str {
        "template"
    }

    async fn render(
        &self,
        quiz: &QuizConfig,
        outcome: &QuizOutcome,
        _answers: &[Answer],
    ) -> QuizflowResult<String> {
        let template = self.config.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        Ok(render_template(template, quiz, outcome).trim().to_string())
    }
}
