use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use appforge_gateway::{router, AppState};
use appforge_llm::errors::LlmError;
use appforge_llm::gateway::Gateway;
use appforge_pipeline::prelude::ApplicationService;
use appforge_storage::errors::StorageError;
use appforge_storage::prelude::{
    HealthProbe, MemoryApplicationStore, MemoryCompletionLogStore, MemoryDatastore,
};

struct ScriptedGateway {
    outcomes: Mutex<Vec<Result<String, LlmError>>>,
}

impl ScriptedGateway {
    fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(vec![Ok(text.to_string())]),
        })
    }

    // Empty script: every call answers with an empty JSON object.
    fn unscripted() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl Gateway for ScriptedGateway {
    async fn invoke(
        &self,
        _prompt_config: &str,
        _input_data: &Value,
        _output_schema: &Value,
    ) -> Result<String, LlmError> {
        let mut outcomes = self.outcomes.lock();
        if outcomes.is_empty() {
            Ok("{}".to_string())
        } else {
            outcomes.remove(0)
        }
    }
}

struct BrokenStore;

#[async_trait::async_trait]
impl HealthProbe for BrokenStore {
    async fn ping(&self) -> Result<(), StorageError> {
        Err(StorageError::unavailable("connection pool exhausted"))
    }
}

fn app_with(gateway: Arc<ScriptedGateway>) -> Router {
    let datastore = MemoryDatastore::new();
    let apps = Arc::new(MemoryApplicationStore::new(&datastore));
    let logs = Arc::new(MemoryCompletionLogStore::new(&datastore));
    let service = Arc::new(ApplicationService::new(apps, logs, gateway));
    router(AppState {
        service,
        health: Arc::new(datastore),
    })
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1_048_576).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn create_payload() -> Value {
    json!({
        "prompt_config": "Classify the sentiment of the review.",
        "input_schema": {
            "type": "object",
            "properties": { "review_text": { "type": "string" } },
            "required": ["review_text"]
        },
        "output_schema": {
            "type": "object",
            "properties": { "sentiment": { "type": "string" } },
            "required": ["sentiment"]
        }
    })
}

async fn create_app(app: &Router) -> String {
    let (status, body) = send_json(app, "POST", "/applications", Some(create_payload())).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().expect("id returned").to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app_with(ScriptedGateway::unscripted());
    let (status, body) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn health_maps_unreachable_store_to_500() {
    let gateway = ScriptedGateway::unscripted();
    let datastore = MemoryDatastore::new();
    let apps = Arc::new(MemoryApplicationStore::new(&datastore));
    let logs = Arc::new(MemoryCompletionLogStore::new(&datastore));
    let service = Arc::new(ApplicationService::new(apps, logs, gateway));
    let app = router(AppState {
        service,
        health: Arc::new(BrokenStore),
    });

    let (status, body) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "storage.unavailable");
}

#[tokio::test]
async fn create_application_returns_id() {
    let app = app_with(ScriptedGateway::unscripted());
    let id = create_app(&app).await;
    assert!(!id.is_empty());
}

#[tokio::test]
async fn create_application_rejects_malformed_schema() {
    let app = app_with(ScriptedGateway::unscripted());
    let mut payload = create_payload();
    payload["input_schema"] = json!({"type": "invalid_type"});

    let (status, body) = send_json(&app, "POST", "/applications", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Schema validation error"));
}

#[tokio::test]
async fn completion_round_trip_over_http() {
    let app = app_with(ScriptedGateway::returning(r#"{"sentiment":"Positive"}"#));
    let id = create_app(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/applications/{id}/completions"),
        Some(json!({"input_data": {"review_text": "I loved it"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"output_data": {"sentiment": "Positive"}}));

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/applications/{id}/completions/logs"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["application_id"], json!(id));
    assert_eq!(
        body["items"][0]["output_data"],
        json!({"sentiment": "Positive"})
    );
    assert!(body["items"][0]["created_at"].is_i64());
    assert!(body["items"][0]["id"].is_string());
}

#[tokio::test]
async fn invalid_input_yields_400_with_diagnostic() {
    let app = app_with(ScriptedGateway::unscripted());
    let id = create_app(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/applications/{id}/completions"),
        Some(json!({"input_data": {"input_key": 123}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation.input");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Input validation failed"));
}

#[tokio::test]
async fn missing_application_yields_404() {
    let app = app_with(ScriptedGateway::unscripted());

    let (status, body) = send_json(
        &app,
        "POST",
        "/applications/no-such-id/completions",
        Some(json!({"input_data": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Application not found");

    let (status, _) = send_json(&app, "GET", "/applications/no-such-id/completions/logs", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", "/applications/no-such-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_204_and_cascades() {
    let app = app_with(ScriptedGateway::returning(r#"{"sentiment":"Positive"}"#));
    let id = create_app(&app).await;

    send_json(
        &app,
        "POST",
        &format!("/applications/{id}/completions"),
        Some(json!({"input_data": {"review_text": "fine"}})),
    )
    .await;

    let (status, body) = send_json(&app, "DELETE", &format!("/applications/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/applications/{id}/completions/logs"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn llm_exhaustion_surfaces_llm_call_error() {
    let gateway = Arc::new(ScriptedGateway {
        outcomes: Mutex::new(vec![Err(LlmError::provider_unavailable(
            "upstream returned status 503",
        ))]),
    });
    let app = app_with(gateway);
    let id = create_app(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/applications/{id}/completions"),
        Some(json!({"input_data": {"review_text": "fine"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "llm.provider_unavailable");
    assert!(body["detail"].as_str().unwrap().contains("LLM call failed"));
}

#[tokio::test]
async fn log_listing_defaults_and_validates_pagination() {
    let app = app_with(ScriptedGateway::unscripted());
    let (status, body) = send_json(
        &app,
        "POST",
        "/applications",
        Some(json!({"prompt_config": "p", "input_schema": {}, "output_schema": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap().to_string();

    for idx in 0..25 {
        let (status, _) = send_json(
            &app,
            "POST",
            &format!("/applications/{id}/completions"),
            Some(json!({"input_data": {"seq": idx}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Defaults: page=1, size=10.
    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/applications/{id}/completions/logs"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["size"], 10);
    assert_eq!(body["total"], 25);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/applications/{id}/completions/logs?page=3&size=10"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/applications/{id}/completions/logs?page=0&size=10"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation.input");
}
