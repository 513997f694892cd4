use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::dialer::CallDispatcher;
use super::domain::LeadId;
use super::repository::{AgentNotifier, LeadRepository, RepositoryError};
use super::service::{CallWebhook, LeadQualificationService, LeadSubmission, QualificationServiceError};

/// Router builder exposing HTTP endpoints for intake, call dispatch, and
/// the call-provider callback.
pub fn lead_router<R, D, N>(service: Arc<LeadQualificationService<R, D, N>>) -> Router
where
    R: LeadRepository + 'static,
    D: CallDispatcher + 'static,
    N: AgentNotifier + 'static,
{
    Router::new()
        .route("/api/v1/leads", post(submit_handler::<R, D, N>))
        .route("/api/v1/leads/:lead_id", get(status_handler::<R, D, N>))
        .route(
            "/api/v1/leads/:lead_id/call",
            post(start_call_handler::<R, D, N>),
        )
        .route(
            "/api/v1/webhooks/call-provider",
            post(call_webhook_handler::<R, D, N>).get(webhook_verification),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, D, N>(
    State(service): State<Arc<LeadQualificationService<R, D, N>>>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    D: CallDispatcher + 'static,
    N: AgentNotifier + 'static,
{
    match service.submit(submission) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(QualificationServiceError::Input(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(QualificationServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "lead already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, D, N>(
    State(service): State<Arc<LeadQualificationService<R, D, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    D: CallDispatcher + 'static,
    N: AgentNotifier + 'static,
{
    let id = LeadId(lead_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(QualificationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "lead_id": id.0,
                "error": "lead not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn start_call_handler<R, D, N>(
    State(service): State<Arc<LeadQualificationService<R, D, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    D: CallDispatcher + 'static,
    N: AgentNotifier + 'static,
{
    let id = LeadId(lead_id);
    match service.start_call(&id) {
        Ok(dispatched) => {
            let payload = json!({
                "lead_id": id.0,
                "call_id": dispatched.call_id,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(QualificationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "lead_id": id.0,
                "error": "lead not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(QualificationServiceError::Dialer(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn call_webhook_handler<R, D, N>(
    State(service): State<Arc<LeadQualificationService<R, D, N>>>,
    axum::Json(webhook): axum::Json<CallWebhook>,
) -> Response
where
    R: LeadRepository + 'static,
    D: CallDispatcher + 'static,
    N: AgentNotifier + 'static,
{
    match service.complete_call(webhook) {
        Ok(record) => {
            let payload = json!({
                "success": true,
                "lead": record.status_view(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(QualificationServiceError::MissingLeadId) => {
            let payload = json!({
                "error": "missing lead_id in webhook metadata",
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(QualificationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "lead not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

/// Verification ping some providers send before enabling a webhook URL.
pub(crate) async fn webhook_verification() -> Response {
    let payload = json!({
        "status": "call provider webhook endpoint active",
        "timestamp": Utc::now().to_rfc3339(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
