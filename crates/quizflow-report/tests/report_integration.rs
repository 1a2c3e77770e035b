use chrono::Utc;
use quizflow_core::QuizflowError;
use quizflow_quiz::{AnswerOption, Question, QuizConfig, QuizOutcome, ResultTier};
use quizflow_report::{CompletionReporter, ReportBackend, ReportConfig, ReportProvider};
use quizflow_session::Answer;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture() -> (QuizConfig, QuizOutcome, Vec<Answer>) {
    let tier = ResultTier {
        min_score: 0,
        max_score: 10,
        label: "Solid".into(),
        narrative: "Decent shape.".into(),
        recommendation: "Book a call.".into(),
    };
    let quiz = QuizConfig {
        title: "demo".into(),
        intro: None,
        metric_unit: Some("EUR/month".into()),
        questions: vec![Question {
            text: "How often do you review costs?".into(),
            options: vec![AnswerOption {
                label: "Monthly".into(),
                score: 7,
                metric: 300.0,
                feedback: None,
            }],
        }],
        tiers: vec![tier.clone()],
    };
    let answers = vec![Answer {
        question: 1,
        option: 0,
        score: 7,
        metric: 300.0,
        feedback: None,
        answered_at: Utc::now(),
    }];
    let outcome = QuizOutcome {
        total_score: 7,
        total_metric: 300.0,
        tier,
    };
    (quiz, outcome, answers)
}

fn reporter_for(server: &MockServer) -> CompletionReporter {
    CompletionReporter::new(ReportConfig {
        provider: ReportProvider::OpenAi,
        template: None,
        prompt: None,
        model_id: Some("test-model".into()),
        api_key: Some("sk-test".into()),
        api_base_url: Some(server.uri()),
        max_tokens: 256,
    })
}

#[tokio::test]
async fn test_completion_reporter_returns_message_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({"model": "test-model"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Your tailored report." } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (quiz, outcome, answers) = fixture();
    let report = reporter_for(&server)
        .render(&quiz, &outcome, &answers)
        .await
        .unwrap();
    assert_eq!(report, "Your tailored report.");
}

#[tokio::test]
async fn test_completion_reporter_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(serde_json::json!({"error": {"message": "rate limited"}})),
        )
        .mount(&server)
        .await;

    let (quiz, outcome, answers) = fixture();
    let err = reporter_for(&server)
        .render(&quiz, &outcome, &answers)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizflowError::Http(_)));
}

#[tokio::test]
async fn test_completion_reporter_rejects_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": []
        })))
        .mount(&server)
        .await;

    let (quiz, outcome, answers) = fixture();
    let err = reporter_for(&server)
        .render(&quiz, &outcome, &answers)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizflowError::Report(_)));
}
