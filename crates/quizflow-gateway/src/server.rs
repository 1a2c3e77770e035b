use crate::webhook::telegram_webhook_handler;
use quizflow_channels::TelegramChannel;
use quizflow_engine::QuizEngine;
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    /// The quiz engine all events are dispatched through.
    pub engine: Arc<QuizEngine>,
    /// The Telegram channel used for decoding and replying.
    pub telegram: Arc<TelegramChannel>,
    /// Expected value of the `X-Telegram-Bot-Api-Secret-Token` header.
    pub webhook_secret: Option<String>,
}

/// The main gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Builds the gateway router.
    pub fn build(
        engine: Arc<QuizEngine>,
        telegram: Arc<TelegramChannel>,
        webhook_secret: Option<String>,
    ) -> Router {
        let state = Arc::new(AppState {
            engine,
            telegram,
            webhook_secret,
        });

        Router::new()
            .route("/webhook/telegram", post(telegram_webhook_handler))
            .route("/health", get(health_handler))
            .with_state(state)
    }
}

async fn health_handler() -> impl IntoResponse {
    serde_json::json!({"status": "ok", "service": "quizflow"}).to_string()
}
