use crate::server::AppState;
use quizflow_channels::{Channel, TelegramUpdate};
use quizflow_core::Reply;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Validate that a request secret matches the configured secret using
/// constant-time comparison, to prevent timing side channels.
pub fn validate_secret(config_secret: &str, request_secret: &str) -> bool {
    let a = config_secret.as_bytes();
    let b = request_secret.as_bytes();

    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Axum handler for incoming Telegram webhook updates.
///
/// Route: `POST /webhook/telegram`
///
/// Validates the secret token if configured, decodes the update into a
/// user event, dispatches it through the engine, and sends the replies
/// back over the channel. Always acknowledges with 200 once authenticated;
/// Telegram re-delivers non-2xx responses and a retry storm helps nobody.
pub async fn telegram_webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    if let Some(secret) = &state.webhook_secret {
        let request_secret = headers
            .get("x-telegram-bot-api-secret-token")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !validate_secret(secret, request_secret) {
            warn!("Webhook secret validation failed");
            return (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({"error": "invalid secret"}).to_string(),
            );
        }
    }

    let update: TelegramUpdate = match serde_json::from_str(&body) {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "Undecodable webhook body");
            return ok_response();
        }
    };

    let update_id = update.update_id;
    let Some(inbound) = state.telegram.decode_update(&update) else {
        info!(update_id, "Update carried no quiz event, dropped");
        return ok_response();
    };

    // Stop the client-side spinner before doing any real work.
    if let Some(cb) = &update.callback_query {
        if let Err(e) = state.telegram.answer_callback(&cb.id).await {
            warn!(update_id, error = %e, "Failed to answer callback query");
        }
    }

    info!(update_id, user_id = %inbound.user_id, event = ?inbound.event, "Webhook accepted");

    match state.engine.handle_event(&inbound.user_id, inbound.event).await {
        Ok(replies) => {
            if let Err(e) = state.telegram.send_all(&inbound.chat_id, &replies).await {
                warn!(update_id, channel = state.telegram.name(), error = %e, "Failed to send replies");
            }
        }
        Err(e) => {
            // The user must still hear back even when a downstream
            // dependency (store, report API) fails mid-event.
            warn!(update_id, error = %e, "Engine error");
            let notice = Reply::notice(ENGINE_ERROR_NOTICE);
            if let Err(e) = state.telegram.send(&inbound.chat_id, &notice).await {
                warn!(update_id, channel = state.telegram.name(), error = %e, "Failed to send error notice");
            }
        }
    }

    ok_response()
}

/// Sent to the user when event handling fails outright.
pub const ENGINE_ERROR_NOTICE: &str =
    "Sorry, something went wrong on our side. Please try again in a moment.";

fn ok_response() -> (StatusCode, String) {
    (
        StatusCode::OK,
        serde_json::json!({"status": "accepted"}).to_string(),
    )
}
