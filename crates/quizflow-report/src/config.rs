use serde::{Deserialize, Serialize};

/// Which report backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportProvider {
    /// Static template substitution; no network calls.
    #[default]
    Template,
    /// An OpenAI-compatible chat completions API.
    OpenAi,
}

/// Report backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Backend selection.
    #[serde(default)]
    pub provider: ReportProvider,
    /// Report template with `{{score}}`, `{{metric}}`, `{{metric_unit}}`,
    /// `{{tier}}`, `{{narrative}}` and `{{recommendation}}` placeholders.
    /// Falls back to a built-in template when unset.
    #[serde(default)]
    pub template: Option<String>,
    /// System prompt for the completion backend; supports the same
    /// placeholders as `template`.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Model identifier for the completion backend.
    #[serde(default)]
    pub model_id: Option<String>,
    /// API key for the completion backend.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL override (e.g. a proxy or a compatible provider).
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Completion token cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    1024
}

impl ReportConfig {
    /// Effective API base URL for the completion backend.
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or("https://api.openai.com")
    }
}
