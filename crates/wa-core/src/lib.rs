//! # WA Core
//!
//! Core types for the WA-Shield relay backend.
//!
//! This crate provides the building blocks shared by the HTTP surface and
//! the provider integration:
//! - [`WhatsAppApi`] trait for relaying messages through the provider
//! - [`MessageStore`] for in-memory message records
//! - Common types for records, filters and errors
//!
//! ## Example
//!
//! ```rust,ignore
//! use wa_core::{MessageStore, NewMessage};
//!
//! let store = MessageStore::new();
//! let stored = store.append(NewMessage {
//!     id: None,
//!     sender: "alice".into(),
//!     recipient: "bob".into(),
//!     encrypted_content: "hi".into(),
//!     timestamp: None,
//! })?;
//! assert!(!stored.read);
//! ```

pub mod store;

pub use store::{MessageFilter, MessageStore, DEFAULT_LIST_LIMIT};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// Errors that can occur while talking to the WhatsApp Cloud API.
#[derive(Debug, thiserror::Error)]
pub enum WhatsAppError {
    /// HTTP transport error (connection, TLS, malformed response body).
    #[error("http error: {0}")]
    Http(String),
    /// The provider answered with a non-2xx status.
    #[error("provider error: {0}")]
    Provider(String),
}

/// Errors surfaced by the in-memory message store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("message not found: {0}")]
    NotFound(String),
    #[error("duplicate message id: {0}")]
    DuplicateId(String),
}

/// Outbound message kinds understood by the relay.
///
/// Text messages embed the body inline; image and document messages carry
/// the content as a link reference instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Document,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Document => "document",
        }
    }
}

/// A message record held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    /// Opaque content payload; the relay never decrypts or inspects it.
    pub encrypted_content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub read: bool,
}

/// Input for [`MessageStore::append`]. Absent id and timestamp are
/// defaulted at insert time.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: Option<String>,
    pub sender: String,
    pub recipient: String,
    pub encrypted_content: String,
    pub timestamp: Option<OffsetDateTime>,
}

/// Generate an id for a record the caller did not name.
pub fn generate_message_id() -> String {
    format!("msg_{}", Uuid::new_v4())
}

/// Client interface to the WhatsApp Cloud API.
///
/// The four network operations return the provider's raw JSON response;
/// failures carry the provider's error detail and are translated to HTTP
/// responses by the caller. There is no retry or backoff.
#[async_trait]
pub trait WhatsAppApi: Send + Sync {
    /// Relay an outbound message to `to`.
    async fn send_message(
        &self,
        to: &str,
        content: &str,
        kind: MessageKind,
    ) -> Result<Value, WhatsAppError>;

    /// Fetch delivery status and timestamp for a previously sent message.
    async fn message_status(&self, message_id: &str) -> Result<Value, WhatsAppError>;

    /// Issue a read receipt for an inbound message.
    async fn mark_as_read(&self, message_id: &str) -> Result<Value, WhatsAppError>;

    /// Fetch metadata about the sending phone identity.
    async fn phone_number_info(&self) -> Result<Value, WhatsAppError>;

    /// Compare `token` against the configured webhook verification secret.
    ///
    /// Used only for the provider's subscription handshake, not for
    /// per-request authentication.
    fn verify_webhook_token(&self, token: &str) -> bool;
}
