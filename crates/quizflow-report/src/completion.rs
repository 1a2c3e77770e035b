use crate::config::ReportConfig;
use crate::template::render_template;
use crate::ReportBackend;
use quizflow_core::{QuizflowError, QuizflowResult};
use quizflow_quiz::{QuizConfig, QuizOutcome};
use quizflow_session::Answer;
use tracing::info;

const DEFAULT_PROMPT: &str = "\
You write the result message for a diagnosis quiz chatbot. The user scored \
{{score}} points and landed in the '{{tier}}' tier ({{narrative}}). Their \
estimated improvement potential is {{metric}} {{metric_unit}}. Write a short, \
encouraging report that ends with this recommendation: {{recommendation}}";

/// OpenAI-compatible chat-completions reporter.
///
/// Works with OpenAI and any provider that implements the chat completions
/// API, via `api_base_url`.
pub struct CompletionReporter {
    config: ReportConfig,
    http: reqwest::Client,
}

impl CompletionReporter {
    /// Creates a reporter from the report configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn answer_summary(&self, quiz: &QuizConfig, answers: &[Answer]) -> String {
        answers
            .iter()
            .map(|a| {
                let question = quiz
                    .questions
                    .get(a.question - 1)
                    .map(|q| q.text.as_str())
                    .unwrap_or("(unknown question)");
                let label = quiz
                    .questions
                    .get(a.question - 1)
                    .and_then(|q| q.options.get(a.option))
                    .map(|o| o.label.as_str())
                    .unwrap_or("(unknown option)");
                format!("Q{}: {} — answered '{}' ({} points)", a.question, question, label, a.score)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait::async_trait]
impl ReportBackend for CompletionReporter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn render(
        &self,
        quiz: &QuizConfig,
        outcome: &QuizOutcome,
        answers: &[Answer],
    ) -> QuizflowResult<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        let prompt_template = self.config.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
        let system_prompt = render_template(prompt_template, quiz, outcome);
        let user_content = self.answer_summary(quiz, answers);

        let body = serde_json::json!({
            "model": self.config.model_id.as_deref().unwrap_or("gpt-4o-mini"),
            "max_tokens": self.config.max_tokens,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_content },
            ],
        });

        let resp = self
            .http
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.as_deref().unwrap_or_default()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| QuizflowError::Http(e.to_string()))?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| QuizflowError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(QuizflowError::Http(format!(
                "completion API error {status}: {resp_body}"
            )));
        }

        let content = resp_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                QuizflowError::Report("completion response had no message content".to_string())
            })?;

        info!(chars = content.len(), "Report generated by completion API");
        Ok(content.to_string())
    }
}
