//! Outbound WhatsApp API routes, relaying to the Cloud API client.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use wa_core::MessageKind;

use super::{non_empty, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_type: MessageKind,
}

/// POST /api/whatsapp/send
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let (Some(phone_number), Some(message)) = (non_empty(req.phone_number), non_empty(req.message))
    else {
        return Err(ApiError::Validation(
            "Missing phoneNumber or message".to_string(),
        ));
    };

    let data = state
        .whatsapp
        .send_message(&phone_number, &message, req.message_type)
        .await?;
    Ok(ApiResponse::new(data))
}

/// GET /api/whatsapp/message-status/{message_id}
pub async fn message_status(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let data = state.whatsapp.message_status(&message_id).await?;
    Ok(ApiResponse::new(data))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsReadRequest {
    #[serde(default)]
    pub message_id: Option<String>,
}

/// POST /api/whatsapp/mark-as-read
pub async fn mark_as_read(
    State(state): State<AppState>,
    Json(req): Json<MarkAsReadRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let Some(message_id) = non_empty(req.message_id) else {
        return Err(ApiError::Validation("Missing messageId".to_string()));
    };

    let data = state.whatsapp.mark_as_read(&message_id).await?;
    Ok(ApiResponse::new(data))
}

/// GET /api/whatsapp/phone-info
pub async fn phone_info(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let data = state.whatsapp.phone_number_info().await?;
    Ok(ApiResponse::new(data))
}
