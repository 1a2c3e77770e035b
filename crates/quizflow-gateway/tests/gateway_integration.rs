use quizflow_channels::TelegramChannel;
use quizflow_core::{QuizflowError, QuizflowResult};
use quizflow_engine::QuizEngine;
use quizflow_gateway::{GatewayServer, ENGINE_ERROR_NOTICE};
use quizflow_quiz::{AnswerOption, Question, QuizConfig, QuizOutcome, ResultTier};
use quizflow_report::{build_backend, ReportBackend, ReportConfig};
use quizflow_session::{Answer, MemorySessionStore, SessionStore};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn small_quiz() -> QuizConfig {
    QuizConfig {
        title: "mini".into(),
        intro: None,
        metric_unit: None,
        questions: vec![Question {
            text: "Ready?".into(),
            options: vec![
                AnswerOption {
                    label: "No".into(),
                    score: 0,
                    metric: 0.0,
                    feedback: None,
                },
                AnswerOption {
                    label: "Yes".into(),
                    score: 5,
                    metric: 0.0,
                    feedback: None,
                },
            ],
        }],
        tiers: vec![ResultTier {
            min_score: 0,
            max_score: 5,
            label: "Done".into(),
            narrative: "n".into(),
            recommendation: "r".into(),
        }],
    }
}

/// Builds a router backed by a wiremock Telegram API that accepts
/// everything, plus a fresh in-memory store.
async fn test_app(
    secret: Option<&str>,
) -> (axum::Router, Arc<MemorySessionStore>, MockServer) {
    let telegram_api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "result": {}})),
        )
        .mount(&telegram_api)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let engine = Arc::new(
        QuizEngine::new(
            small_quiz(),
            store.clone(),
            build_backend(ReportConfig::default()),
        )
        .unwrap(),
    );
    let telegram = Arc::new(TelegramChannel::new("test-token").with_api_base(telegram_api.uri()));
    let app = GatewayServer::build(engine, telegram, secret.map(String::from));
    (app, store, telegram_api)
}

fn webhook_request(secret: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook/telegram")
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header("x-telegram-bot-api-secret-token", secret);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _, _api) = test_app(None).await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_webhook_rejects_bad_secret() {
    let (app, _, _api) = test_app(Some("real-secret")).await;
    let body = r#"{"update_id": 1}"#;
    let response = app
        .oneshot(webhook_request(Some("wrong"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_rejects_missing_secret() {
    let (app, _, _api) = test_app(Some("real-secret")).await;
    let response = app
        .oneshot(webhook_request(None, r#"{"update_id": 1}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_start_creates_session() {
    let (app, store, _api) = test_app(Some("real-secret")).await;
    let body = serde_json::json!({
        "update_id": 10,
        "message": {
            "from": { "id": 42 },
            "chat": { "id": 42 },
            "text": "/start"
        }
    })
    .to_string();

    let response = app
        .oneshot(webhook_request(Some("real-secret"), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let session = store.get("42").await.unwrap().unwrap();
    assert_eq!(session.current_question, 0);
}

#[tokio::test]
async fn test_webhook_answer_callback_advances_session() {
    let (app, store, _api) = test_app(None).await;

    let start = serde_json::json!({
        "update_id": 11,
        "message": { "from": { "id": 42 }, "chat": { "id": 42 }, "text": "/start" }
    })
    .to_string();
    app.clone()
        .oneshot(webhook_request(None, &start))
        .await
        .unwrap();

    let answer = serde_json::json!({
        "update_id": 12,
        "callback_query": {
            "id": "cb-1",
            "from": { "id": 42 },
            "message": { "chat": { "id": 42 } },
            "data": "ans:1"
        }
    })
    .to_string();
    let response = app
        .oneshot(webhook_request(None, &answer))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let session = store.get("42").await.unwrap().unwrap();
    assert_eq!(session.current_question, 1);
    assert_eq!(session.answers[0].score, 5);
}

#[tokio::test]
async fn test_webhook_acknowledges_undecodable_body() {
    let (app, _, _api) = test_app(None).await;
    let response = app
        .oneshot(webhook_request(None, "not json at all"))
        .await
        .unwrap();
    // Always 200 once authenticated; Telegram re-delivers anything else.
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_acknowledges_irrelevant_update() {
    let (app, store, _api) = test_app(None).await;
    let body = serde_json::json!({
        "update_id": 13,
        "message": { "from": { "id": 7 }, "chat": { "id": 7 }, "text": "hello" }
    })
    .to_string();
    let response = app.oneshot(webhook_request(None, &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.get("7").await.unwrap().is_none());
}

struct DownReporter;

#[async_trait::async_trait]
impl ReportBackend for DownReporter {
    fn name(&self) -> &str {
        "down"
    }

    async fn render(
        &self,
        _quiz: &QuizConfig,
        _outcome: &QuizOutcome,
        _answers: &[Answer],
    ) -> QuizflowResult<String> {
        Err(QuizflowError::Http("completion API unreachable".into()))
    }
}

#[tokio::test]
async fn test_webhook_report_failure_still_messages_the_user() {
    let telegram_api = MockServer::start().await;
    // The apology must reach the chat; verified when the server drops.
    Mock::given(method("POST"))
        .and(path("/bottest-token/sendMessage"))
        .and(body_partial_json(
            serde_json::json!({"chat_id": "42", "text": ENGINE_ERROR_NOTICE}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "result": {}})),
        )
        .expect(1)
        .mount(&telegram_api)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "result": {}})),
        )
        .mount(&telegram_api)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let engine = Arc::new(
        QuizEngine::new(small_quiz(), store.clone(), Arc::new(DownReporter)).unwrap(),
    );
    let telegram = Arc::new(TelegramChannel::new("test-token").with_api_base(telegram_api.uri()));
    let app = GatewayServer::build(engine, telegram, None);

    let start = serde_json::json!({
        "update_id": 20,
        "message": { "from": { "id": 42 }, "chat": { "id": 42 }, "text": "/start" }
    })
    .to_string();
    app.clone().oneshot(webhook_request(None, &start)).await.unwrap();

    let answer = serde_json::json!({
        "update_id": 21,
        "callback_query": {
            "id": "cb-9",
            "from": { "id": 42 },
            "message": { "chat": { "id": 42 } },
            "data": "ans:1"
        }
    })
    .to_string();
    app.clone().oneshot(webhook_request(None, &answer)).await.unwrap();

    let result = serde_json::json!({
        "update_id": 22,
        "message": { "from": { "id": 42 }, "chat": { "id": 42 }, "text": "/result" }
    })
    .to_string();
    let response = app.oneshot(webhook_request(None, &result)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    telegram_api.verify().await;
}
