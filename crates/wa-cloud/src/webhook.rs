//! Serde model for Meta webhook event notifications.
//!
//! Every field is defaulted and every collection falls back to empty, so
//! a truncated or malformed event deserializes instead of failing — the
//! receiver ignores what is absent rather than erroring on it.

use serde::Deserialize;

/// Top-level `object` value for WhatsApp Business events.
pub const BUSINESS_ACCOUNT_OBJECT: &str = "whatsapp_business_account";

/// Change field carrying inbound messages.
pub const FIELD_MESSAGES: &str = "messages";

/// Change field carrying delivery status updates.
pub const FIELD_MESSAGE_STATUS: &str = "message_status";

/// Top-level webhook notification.
#[derive(Debug, Clone, Deserialize)]
pub struct EventNotification {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<EventEntry>,
}

/// A single entry in the notification.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub changes: Vec<EventChange>,
}

/// A change within an entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EventChange {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: ChangeValue,
}

/// The change payload carrying messages and/or status updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
    #[serde(default)]
    pub statuses: Vec<StatusUpdate>,
}

/// A single inbound message notification.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub id: String,
    /// Unix timestamp as a string, per the provider's event format.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextBody>,
}

/// Text content within an inbound message.
#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: String,
}

/// A delivery status update for a previously sent message.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub recipient_id: String,
}
