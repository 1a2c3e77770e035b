use quizflow_core::{QuizflowResult, Reply, UserEvent};
use async_trait::async_trait;

/// A decoded inbound event with its routing identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Stable user identifier; the session-store key.
    pub user_id: String,
    /// Platform chat identifier to reply into.
    pub chat_id: String,
    /// The decoded event.
    pub event: UserEvent,
}

/// A messaging platform adapter.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &str;

    /// Renders one reply fragment into the given chat.
    async fn send(&self, chat_id: &str, reply: &Reply) -> QuizflowResult<()>;

    /// Renders a sequence of reply fragments in order, stopping at the
    /// first send failure.
    async fn send_all(&self, chat_id: &str, replies: &[Reply]) -> QuizflowResult<()> {
        for reply in replies {
            self.send(chat_id, reply).await?;
        }
        Ok(())
    }
}
