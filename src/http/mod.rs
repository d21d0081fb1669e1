//! HTTP surface: outbound WhatsApp API, message store CRUD and the
//! provider webhook receiver, composed under a single router with JSON
//! bodies, permissive CORS and baseline security headers.

pub mod messages;
pub mod webhook;
pub mod whatsapp;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;
use wa_core::{MessageStore, StoreError, WhatsAppApi, WhatsAppError};

/// Shared application state, constructed once per process.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MessageStore>,
    pub whatsapp: Arc<dyn WhatsAppApi>,
}

/// Success envelope wrapping every data-carrying response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// HTTP-facing error classification.
///
/// Validation failures become 400, lookup misses 404, duplicate-id
/// rejections 409 and provider/runtime failures 500. Every variant
/// renders as `{"success": false, "error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Upstream(#[from] WhatsAppError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound("Message not found".to_string()),
            err @ StoreError::DuplicateId(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (
            status,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Treat an absent or empty string as a missing field.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// GET /health
async fn health() -> impl IntoResponse {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(json!({ "status": "OK", "timestamp": timestamp }))
}

/// Fallback for unknown routes.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}

/// Stamp baseline security headers on every response.
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    response
}

/// Assemble the full route table over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/whatsapp/send", post(whatsapp::send))
        .route(
            "/api/whatsapp/message-status/{message_id}",
            get(whatsapp::message_status),
        )
        .route("/api/whatsapp/mark-as-read", post(whatsapp::mark_as_read))
        .route("/api/whatsapp/phone-info", get(whatsapp::phone_info))
        .route("/api/messages", post(messages::create).get(messages::list))
        .route(
            "/api/messages/{message_id}",
            get(messages::fetch)
                .put(messages::mark_read)
                .delete(messages::remove),
        )
        .route("/webhook", get(webhook::verify).post(webhook::receive))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn(security_headers))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
