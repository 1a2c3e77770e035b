use crate::channel::{Channel, InboundEvent};
use quizflow_core::{QuizflowError, QuizflowResult, Reply, UserEvent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Telegram Bot API channel adapter.
///
/// Runs in webhook mode: Telegram POSTs updates to the gateway, which
/// passes them to [`TelegramChannel::decode_update`]; replies go out via
/// the `sendMessage` method, with inline keyboards for question prompts.
pub struct TelegramChannel {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

// ── Telegram API payload types ──────────────────────────────────────────────

/// One webhook update from Telegram.
#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    /// Monotonic update id.
    pub update_id: i64,
    /// A plain text message, if this update carries one.
    pub message: Option<TelegramMessagePayload>,
    /// An inline-keyboard button press, if this update carries one.
    pub callback_query: Option<TelegramCallbackQuery>,
}

/// An incoming text message.
#[derive(Debug, Deserialize)]
pub struct TelegramMessagePayload {
    /// Sending user; absent for channel posts.
    pub from: Option<TelegramUser>,
    /// The chat the message arrived in.
    pub chat: TelegramChat,
    /// Message text, if any.
    pub text: Option<String>,
}

/// An inline-keyboard button press.
#[derive(Debug, Deserialize)]
pub struct TelegramCallbackQuery {
    /// Callback query id, needed to acknowledge the press.
    pub id: String,
    /// The user who pressed the button.
    pub from: TelegramUser,
    /// The message the keyboard was attached to.
    pub message: Option<TelegramMessagePayload>,
    /// The button's `callback_data`.
    pub data: Option<String>,
}

/// A Telegram user.
#[derive(Debug, Deserialize)]
pub struct TelegramUser {
    /// Numeric user id.
    pub id: i64,
}

/// A Telegram chat.
#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    /// Numeric chat id.
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[allow(dead_code)]
    result: Option<T>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<serde_json::Value>,
}

// ── Implementation ──────────────────────────────────────────────────────────

impl TelegramChannel {
    /// Creates a channel for the given bot token.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: "https://api.telegram.org".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API base URL (used by tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Decodes one webhook update into an [`InboundEvent`].
    ///
    /// Callback payloads are `start`, `ans:<index>` and `result`; the text
    /// commands `/start` and `/result` map to the same events. Anything
    /// else returns `None` and the update is acknowledged and dropped.
    pub fn decode_update(&self, update: &TelegramUpdate) -> Option<InboundEvent> {
        if let Some(cb) = &update.callback_query {
            let chat_id = cb.message.as_ref().map(|m| m.chat.id)?;
            let event = Self::parse_payload(cb.data.as_deref()?)?;
            return Some(InboundEvent {
                user_id: cb.from.id.to_string(),
                chat_id: chat_id.to_string(),
                event,
            });
        }

        if let Some(msg) = &update.message {
            let user = msg.from.as_ref()?;
            let event = match msg.text.as_deref()?.trim() {
                "/start" => UserEvent::Start,
                "/result" => UserEvent::RequestResult,
                other => {
                    debug!(update_id = update.update_id, text = other, "Ignoring text");
                    return None;
                }
            };
            return Some(InboundEvent {
                user_id: user.id.to_string(),
                chat_id: msg.chat.id.to_string(),
                event,
            });
        }

        None
    }

    fn parse_payload(data: &str) -> Option<UserEvent> {
        match data {
            "start" => Some(UserEvent::Start),
            "result" => Some(UserEvent::RequestResult),
            other => {
                let index: usize = other.strip_prefix("ans:")?.parse().ok()?;
                Some(UserEvent::Answer(index))
            }
        }
    }

    /// Acknowledges a callback query so the client stops its spinner.
    pub async fn answer_callback(&self, callback_id: &str) -> QuizflowResult<()> {
        let url = self.api_url("answerCallbackQuery");
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "callback_query_id": callback_id }))
            .send()
            .await
            .map_err(|e| QuizflowError::Channel(format!("Telegram send error: {e}")))?;

        let body: TelegramResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| QuizflowError::Channel(format!("Telegram parse error: {e}")))?;

        if !body.ok {
            return Err(QuizflowError::Channel(format!(
                "Telegram answerCallbackQuery failed: {}",
                body.description.unwrap_or_default()
            )));
        }
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    fn render(reply: &Reply) -> (String, Option<serde_json::Value>) {
        match reply {
            Reply::Question(q) => {
                let keyboard: Vec<Vec<serde_json::Value>> = q
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, label)| {
                        vec![serde_json::json!({
                            "text": label,
                            "callback_data": format!("ans:{i}"),
                        })]
                    })
                    .collect();
                (
                    format!("Question {}/{}\n{}", q.ordinal, q.total, q.text),
                    Some(serde_json::json!({ "inline_keyboard": keyboard })),
                )
            }
            Reply::Feedback(fb) => {
                let mut text = String::new();
                if let Some(feedback) = &fb.feedback {
                    text.push_str(feedback);
                    text.push_str("\n\n");
                }
                text.push_str(&format!("Score so far: {}", fb.running_score));
                if fb.running_metric != 0.0 {
                    text.push_str(&format!(
                        "\nImprovement potential so far: {:.0} {}",
                        fb.running_metric,
                        fb.metric_unit.as_deref().unwrap_or_default()
                    ));
                }
                (text, None)
            }
            Reply::Report { text } => (text.clone(), None),
            Reply::Notice { text } => (text.clone(), None),
        }
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, chat_id: &str, reply: &Reply) -> QuizflowResult<()> {
        let url = self.api_url("sendMessage");
        let (text, reply_markup) = Self::render(reply);

        let payload = SendMessageRequest {
            chat_id,
            text: &text,
            reply_markup,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| QuizflowError::Channel(format!("Telegram send error: {e}")))?;

        let body: TelegramResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| QuizflowError::Channel(format!("Telegram parse error: {e}")))?;

        if !body.ok {
            return Err(QuizflowError::Channel(format!(
                "Telegram sendMessage failed: {}",
                body.description.unwrap_or_default()
            )));
        }

        Ok(())
    }
}
