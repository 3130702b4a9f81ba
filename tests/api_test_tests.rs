mod common;

use std::sync::Arc;

use api_harness::client::{ClientError, HttpResponse, Method, RequestOptions};
use api_harness::logging::LogWriter;
use api_harness::{ApiTest, AuthConfig, HarnessConfig, ReportStore, TestError, TestStatus};
use common::{client_with, create_test_dir, test_config, ScriptedTransport, POLL};
use serde_json::json;

fn user_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "username": {"type": "string"}
        },
        "required": ["id", "username"]
    })
}

#[tokio::test]
async fn test_passing_test_records_success() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(HttpResponse::new(201).with_json(&json!({"id": 1, "username": "testuser"}))),
    );
    let client = client_with(test_config(), &transport);
    let store = ReportStore::start_with_poll_interval(POLL);

    let test = ApiTest::new("test_create_user", "UserApi", "/users")
        .method(Method::Post)
        .expect_status(201)
        .expect_schema(user_schema())
        .expect_header("content-type", "application/json");

    let response = test
        .run(&client, &store, RequestOptions::new().json(json!({"username": "testuser"})))
        .await
        .unwrap();
    assert_eq!(response.status, 201);
    store.stop().await;

    let results = store.results().await;
    assert_eq!(results.len(), 1);
    let outcome = &results[0];
    assert_eq!(outcome.status, TestStatus::Success);
    assert_eq!(outcome.test_class, "UserApi");
    assert_eq!(outcome.method, "POST");
    assert_eq!(outcome.endpoint, "/users");
    assert_eq!(outcome.response_code, Some(201));
    assert!(outcome.error_message.is_none());
    assert!(outcome.execution_time >= 0.0);

    let requests = transport.requests();
    assert_eq!(requests[0].url, "http://api.test/users");
    assert_eq!(requests[0].json, Some(json!({"username": "testuser"})));
}

#[tokio::test]
async fn test_all_failed_checks_are_recorded() {
    let transport = Arc::new(
        ScriptedTransport::new().respond(HttpResponse::new(404).with_json(&json!({"detail": "missing"}))),
    );
    let client = client_with(test_config(), &transport);
    let store = ReportStore::start_with_poll_interval(POLL);

    let test = ApiTest::new("test_get_user", "UserApi", "/users/1").expect_schema(user_schema());
    let err = test.run(&client, &store, RequestOptions::new()).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.failures().len(), 2);
    assert_eq!(err.failures()[0], "Expected status code 200, got 404");
    assert!(err.failures()[1].starts_with("JSON schema validation failed: "));
    store.stop().await;

    let results = store.results().await;
    let outcome = &results[0];
    assert_eq!(outcome.status, TestStatus::Failed);
    assert_eq!(outcome.response_code, Some(404));
    assert_eq!(outcome.validation_errors.as_ref().map(Vec::len), Some(2));
    assert_eq!(outcome.error_message.as_deref(), Some(err.to_string().as_str()));
}

#[tokio::test]
async fn test_retry_exhaustion_records_error() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .fail(ClientError::Connection("refused".to_string()))
            .fail(ClientError::Timeout("slow".to_string()))
            .fail(ClientError::Connection("refused".to_string())),
    );
    let config = HarnessConfig {
        retry_attempts: 2,
        ..test_config()
    };
    let client = client_with(config, &transport);
    let store = ReportStore::start_with_poll_interval(POLL);

    let test = ApiTest::new("test_health", "Health", "/health");
    let err = test.run(&client, &store, RequestOptions::new()).await.unwrap_err();

    assert_eq!(transport.attempts(), 3);
    assert!(matches!(err, TestError::Execution(_)));
    assert!(err.to_string().starts_with("Request failed after 3 attempts"));
    store.stop().await;

    let results = store.results().await;
    let outcome = &results[0];
    assert_eq!(outcome.status, TestStatus::Error);
    assert!(outcome.response_code.is_none());
    assert!(outcome.validation_errors.is_none());
    assert_eq!(store.snapshot().error_tests, 1);
}

#[tokio::test]
async fn test_non_retryable_error_is_not_retried() {
    let transport = Arc::new(
        ScriptedTransport::new().fail(ClientError::InvalidRequest("bad header".to_string())),
    );
    let client = client_with(test_config(), &transport);

    let err = client
        .request(Method::Get, "/users", RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert_eq!(transport.attempts(), 1);
}

#[tokio::test]
async fn test_retry_then_success() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .fail(ClientError::Timeout("slow".to_string()))
            .respond(HttpResponse::new(200)),
    );
    let client = client_with(test_config(), &transport);

    let response = client.get("/health", None).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(transport.attempts(), 2);
}

#[tokio::test]
async fn test_prepare_failure_records_error() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = client_with(test_config(), &transport);
    let store = ReportStore::start_with_poll_interval(POLL);

    let test = ApiTest::new("test_fixture", "UserApi", "/users");
    let err = test
        .run_with(&client, &store, || async {
            Err::<RequestOptions, _>(anyhow::anyhow!("fixture unavailable"))
        })
        .await
        .unwrap_err();

    assert_eq!(err, TestError::Execution("fixture unavailable".to_string()));
    assert_eq!(transport.attempts(), 0);
    store.stop().await;

    let results = store.results().await;
    assert_eq!(results[0].status, TestStatus::Error);
    assert_eq!(results[0].error_message.as_deref(), Some("fixture unavailable"));
}

#[tokio::test]
async fn test_outcome_headers_are_masked() {
    let transport = Arc::new(
        ScriptedTransport::new().respond(HttpResponse::new(200).with_header("Set-Cookie", "a=1")),
    );
    let config = HarnessConfig {
        auth: AuthConfig::bearer("secret-token"),
        ..test_config()
    };
    let client = client_with(config, &transport);
    let store = ReportStore::start_with_poll_interval(POLL);

    ApiTest::new("test_me", "UserApi", "/me")
        .run(&client, &store, RequestOptions::new().header("X-Api-Key", "k"))
        .await
        .unwrap();
    store.stop().await;

    assert_eq!(transport.requests()[0].headers["Authorization"], "Bearer secret-token");

    let results = store.results().await;
    let request_headers = results[0].request_headers.as_ref().unwrap();
    assert_eq!(request_headers["Authorization"], "*****");
    assert_eq!(request_headers["X-Api-Key"], "*****");
    assert_eq!(results[0].response_headers.as_ref().unwrap()["Set-Cookie"], "a=1");
}

#[tokio::test]
async fn test_requests_are_logged_per_attempt() {
    let dir = create_test_dir();
    let path = dir.path().join("api.log");
    let writer = LogWriter::start_with_poll_interval(&path, POLL);

    let transport = Arc::new(
        ScriptedTransport::new()
            .fail(ClientError::Connection("refused".to_string()))
            .respond(HttpResponse::new(200).with_json(&json!({"ok": true}))),
    );
    let client = client_with(test_config(), &transport).with_logger(writer.logger());

    client
        .post("/login", Some(json!({"username": "u", "password": "p4ss"})), None)
        .await
        .unwrap();
    writer.stop().await;

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("REQUEST:").count(), 2);
    assert_eq!(content.matches("RESPONSE (").count(), 1);
    assert!(!content.contains("p4ss"));
}
