//! Provider webhook receiver: subscription handshake and event intake.
//!
//! Events are logged and acknowledged only; nothing here mutates the
//! message store.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use wa_cloud::webhook::{
    EventChange, EventNotification, BUSINESS_ACCOUNT_OBJECT, FIELD_MESSAGES, FIELD_MESSAGE_STATUS,
};

use super::AppState;

/// Query parameters of the provider's subscription handshake.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(default, rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(default, rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(default, rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /webhook
///
/// Echoes the literal challenge value when the mode is `subscribe` and
/// the token matches the configured secret; anything else is forbidden.
pub async fn verify(State(state): State<AppState>, Query(params): Query<VerifyParams>) -> Response {
    info!(mode = ?params.mode, "webhook verification request");

    let subscribed = params.mode.as_deref() == Some("subscribe");
    let token_ok = params
        .verify_token
        .as_deref()
        .map_or(false, |token| state.whatsapp.verify_webhook_token(token));

    if subscribed && token_ok {
        info!("webhook verified");
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        error!("webhook verification failed");
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Webhook verification failed" })),
        )
            .into_response()
    }
}

/// POST /webhook
///
/// Acknowledges WhatsApp Business events after logging the first change
/// of the first entry. Absent nested fields are ignored, never an error.
pub async fn receive(Json(event): Json<EventNotification>) -> Response {
    if event.object != BUSINESS_ACCOUNT_OBJECT {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Not a WhatsApp webhook" })),
        )
            .into_response();
    }

    if let Some(change) = event.entry.first().and_then(|entry| entry.changes.first()) {
        log_change(change);
    }

    (StatusCode::OK, Json(json!({ "received": true }))).into_response()
}

fn log_change(change: &EventChange) {
    match change.field.as_str() {
        FIELD_MESSAGES => {
            if let Some(message) = change.value.messages.first() {
                match message.kind.as_str() {
                    "text" => {
                        let body = message
                            .text
                            .as_ref()
                            .map(|text| text.body.as_str())
                            .unwrap_or_default();
                        info!(from = %message.from, body = %body, "text message received");
                    }
                    "image" => info!(from = %message.from, "image message received"),
                    "document" => info!(from = %message.from, "document message received"),
                    other => info!(from = %message.from, kind = %other, "message received"),
                }
            }
        }
        FIELD_MESSAGE_STATUS => {
            if let Some(status) = change.value.statuses.first() {
                info!(message_id = %status.id, status = %status.status, "message status update");
                match status.status.as_str() {
                    "delivered" => info!(message_id = %status.id, "message delivered"),
                    "read" => info!(message_id = %status.id, "message read"),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}
