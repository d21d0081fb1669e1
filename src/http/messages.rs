//! Message store CRUD routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::info;
use wa_core::{MessageFilter, NewMessage, StoredMessage, DEFAULT_LIST_LIMIT};

use super::{non_empty, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub encrypted_content: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// POST /api/messages
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StoredMessage>>), ApiError> {
    let (Some(sender), Some(recipient), Some(encrypted_content)) = (
        non_empty(req.sender),
        non_empty(req.recipient),
        non_empty(req.encrypted_content),
    ) else {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    };

    let stored = state.store.append(NewMessage {
        id: req.message_id,
        sender,
        recipient,
        encrypted_content,
        timestamp: req.timestamp,
    })?;
    info!(message_id = %stored.id, "message stored");

    Ok((StatusCode::CREATED, ApiResponse::new(stored)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/messages
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ApiResponse<Vec<StoredMessage>>> {
    let filter = MessageFilter {
        sender: query.sender,
        recipient: query.recipient,
    };
    let data = state
        .store
        .list(&filter, query.limit.unwrap_or(DEFAULT_LIST_LIMIT));
    ApiResponse::new(data)
}

/// GET /api/messages/{message_id}
pub async fn fetch(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Result<Json<ApiResponse<StoredMessage>>, ApiError> {
    Ok(ApiResponse::new(state.store.get(&message_id)?))
}

/// PUT /api/messages/{message_id}
pub async fn mark_read(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Result<Json<ApiResponse<StoredMessage>>, ApiError> {
    Ok(ApiResponse::new(state.store.mark_read(&message_id)?))
}

/// DELETE /api/messages/{message_id}
pub async fn remove(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.remove(&message_id)?;
    Ok(Json(
        json!({ "success": true, "message": "Message deleted" }),
    ))
}
