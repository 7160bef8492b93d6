use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use appforge_errors::prelude::ErrorObj;
use appforge_pipeline::prelude::{ApplicationService, PipelineError};
use appforge_storage::prelude::HealthProbe;
use appforge_types::prelude::Id;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ApplicationService>,
    pub health: Arc<dyn HealthProbe>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/applications", post(create_application))
        .route("/applications/:id", delete(delete_application))
        .route("/applications/:id/completions", post(generate_completion))
        .route(
            "/applications/:id/completions/logs",
            get(list_completion_logs),
        )
        .with_state(state)
}

fn error_response(obj: ErrorObj) -> Response {
    let view = obj.to_public();
    error!(
        code = %view.code,
        dev = obj.message_dev.as_deref().unwrap_or("n/a"),
        "request failed: {}",
        view.message
    );
    let status =
        StatusCode::from_u16(view.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "code": view.code, "detail": view.message })),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_response(self.0.into_inner())
    }
}

/// Transport-side wrapper so handlers can use `?` on pipeline results.
pub struct AppError(PipelineError);

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError(err)
    }
}

async fn health(State(state): State<AppState>) -> Response {
    match state.health.ping().await {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(err) => error_response(err.into_inner()),
    }
}

#[derive(Deserialize)]
struct ApplicationCreatePayload {
    prompt_config: String,
    input_schema: serde_json::Value,
    output_schema: serde_json::Value,
}

async fn create_application(
    State(state): State<AppState>,
    Json(payload): Json<ApplicationCreatePayload>,
) -> Result<Response, AppError> {
    let application = state
        .service
        .create_application(
            payload.prompt_config,
            payload.input_schema,
            payload.output_schema,
        )
        .await?;
    Ok(Json(json!({ "id": application.id })).into_response())
}

async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.service.delete_application(&Id(id)).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[derive(Deserialize)]
struct InferencePayload {
    input_data: serde_json::Value,
}

async fn generate_completion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<InferencePayload>,
) -> Result<Response, AppError> {
    let output_data = state
        .service
        .generate_completion(&Id(id), payload.input_data)
        .await?;
    Ok(Json(json!({ "output_data": output_data })).into_response())
}

#[derive(Deserialize)]
struct LogsQuery {
    page: Option<u64>,
    size: Option<u64>,
}

async fn list_completion_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<Response, AppError> {
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    let logs = state.service.list_logs(&Id(id), page, size).await?;
    Ok(Json(logs).into_response())
}
