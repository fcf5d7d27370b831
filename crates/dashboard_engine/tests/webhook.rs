use std::time::Duration;

use chrono::{TimeZone, Utc};
use dashboard_core::{
    fallback_payload, validate_website_url, WebhookOutcome, WebhookPayload, WebhookRequest,
};
use dashboard_engine::{ReqwestWebhookClient, WebhookClient, WebhookSettings};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request_for(endpoint: String) -> WebhookRequest {
    let target = validate_website_url("https://acme.example").unwrap();
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    WebhookRequest {
        endpoint,
        payload: WebhookPayload::new("JOB_1735787045000".to_string(), &target, now),
    }
}

fn client() -> ReqwestWebhookClient {
    ReqwestWebhookClient::new(WebhookSettings::default())
}

#[tokio::test]
async fn posts_expected_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "job_id": "JOB_1735787045000",
            "website_url": "https://acme.example",
            "website_host": "acme.example",
            "run_folder_hint": "AUTO_EMP_acme.example_2025-01-02T03:04:05.000Z",
            "assets": { "capture_images": true, "capture_logo": true, "max_images": 5 },
            "outputs": {
                "create_google_doc": true,
                "include_benefits": true,
                "include_matched_benefits": true
            },
            "timestamp": "2025-01-02T03:04:05.000Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client()
        .deliver(&request_for(format!("{}/hook", server.uri())))
        .await;
    assert!(matches!(outcome, WebhookOutcome::Completed(_)));
}

#[tokio::test]
async fn json_success_is_passed_through() {
    let server = MockServer::start().await;
    let body = json!({
        "results": { "company_name": "Acme Inc", "doc_url": "https://docs.example/x" }
    });
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let outcome = client()
        .deliver(&request_for(format!("{}/hook", server.uri())))
        .await;
    assert_eq!(outcome, WebhookOutcome::Completed(body));
}

#[tokio::test]
async fn plain_text_success_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("Accepted", "text/plain"))
        .mount(&server)
        .await;

    let outcome = client()
        .deliver(&request_for(format!("{}/hook", server.uri())))
        .await;
    assert_eq!(
        outcome,
        WebhookOutcome::Completed(fallback_payload("JOB_1735787045000", "https://acme.example"))
    );
}

#[tokio::test]
async fn broken_json_success_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"results\":", "application/json"))
        .mount(&server)
        .await;

    let outcome = client()
        .deliver(&request_for(format!("{}/hook", server.uri())))
        .await;
    assert_eq!(
        outcome,
        WebhookOutcome::Completed(fallback_payload("JOB_1735787045000", "https://acme.example"))
    );
}

#[tokio::test]
async fn server_error_fails_with_truncated_summary() {
    let server = MockServer::start().await;
    let long_body = format!("server error {}", "x".repeat(200));
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string(long_body.clone()))
        .mount(&server)
        .await;

    let outcome = client()
        .deliver(&request_for(format!("{}/hook", server.uri())))
        .await;
    let expected: String = long_body.chars().take(100).collect();
    assert_eq!(
        outcome,
        WebhookOutcome::Failed {
            message: format!("HTTP 500: {expected}")
        }
    );
}

#[tokio::test]
async fn connection_refused_fails_job() {
    // Bind then drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let outcome = client()
        .deliver(&request_for(format!("http://127.0.0.1:{port}/hook")))
        .await;
    match outcome {
        WebhookOutcome::Failed { message } => {
            assert!(!message.is_empty());
            assert!(!message.starts_with("HTTP "));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_endpoint_fails_without_network() {
    let outcome = client()
        .deliver(&request_for("not a webhook".to_string()))
        .await;
    match outcome {
        WebhookOutcome::Failed { message } => {
            assert!(message.contains("invalid webhook endpoint"))
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn configured_timeout_turns_hang_into_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_string("late"),
        )
        .mount(&server)
        .await;

    let settings = WebhookSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..WebhookSettings::default()
    };
    let outcome = ReqwestWebhookClient::new(settings)
        .deliver(&request_for(format!("{}/slow", server.uri())))
        .await;
    assert!(matches!(outcome, WebhookOutcome::Failed { .. }));
}
