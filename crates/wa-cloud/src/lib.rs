//! WhatsApp Cloud (Meta Graph) API backend for the WA-Shield relay.
//!
//! Implements [`WhatsAppApi`] over the Graph REST endpoints: message
//! send, delivery status, read receipts and phone identity metadata.
//! The serde model for inbound webhook notifications lives in
//! [`webhook`].

pub mod webhook;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use wa_core::{MessageKind, WhatsAppApi, WhatsAppError};

/// `messaging_product` value stamped on every Cloud API request.
const MESSAGING_PRODUCT: &str = "whatsapp";

/// WhatsApp Cloud API REST client.
///
/// All four network operations attach the configured bearer credential
/// and return the provider's raw JSON response. There is no retry,
/// backoff or per-call timeout beyond the HTTP client's defaults.
#[derive(Clone, Debug)]
pub struct CloudApiClient {
    /// Graph API base URL, e.g. `https://graph.facebook.com/v18.0`.
    base_url: String,
    /// Identifier of the sending phone number.
    phone_number_id: String,
    /// Bearer credential for the Cloud API.
    access_token: String,
    /// Shared secret for the webhook subscription handshake.
    verify_token: String,
    http: reqwest::Client,
}

impl CloudApiClient {
    pub fn new<S: Into<String>>(
        base_url: S,
        phone_number_id: S,
        access_token: S,
        verify_token: S,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            phone_number_id: phone_number_id.into(),
            access_token: access_token.into(),
            verify_token: verify_token.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Endpoint for sending messages and read receipts.
    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.base_url, self.phone_number_id)
    }

    /// Endpoint for a single Graph node (message id or phone number id).
    fn node_url(&self, node: &str) -> String {
        format!("{}/{}", self.base_url, node)
    }
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct MediaLink<'a> {
    link: &'a str,
}

/// Provider-specific send envelope. Text messages embed the body; image
/// and document messages reference the content as a link instead.
#[derive(Debug, Serialize)]
struct OutboundEnvelope<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<MediaLink<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<MediaLink<'a>>,
}

impl<'a> OutboundEnvelope<'a> {
    fn new(to: &'a str, content: &'a str, kind: MessageKind) -> Self {
        let mut envelope = Self {
            messaging_product: MESSAGING_PRODUCT,
            to,
            kind,
            text: None,
            image: None,
            document: None,
        };
        match kind {
            MessageKind::Text => envelope.text = Some(TextContent { body: content }),
            MessageKind::Image => envelope.image = Some(MediaLink { link: content }),
            MessageKind::Document => envelope.document = Some(MediaLink { link: content }),
        }
        envelope
    }
}

#[derive(Debug, Serialize)]
struct ReadReceipt<'a> {
    messaging_product: &'static str,
    status: &'static str,
    message_id: &'a str,
}

/// Turn a provider reply into its JSON payload, surfacing non-2xx
/// statuses as [`WhatsAppError::Provider`] with the provider's detail.
async fn into_json(res: reqwest::Response) -> Result<Value, WhatsAppError> {
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(WhatsAppError::Provider(format!("HTTP {}: {}", status, body)));
    }

    let raw = res
        .text()
        .await
        .map_err(|e| WhatsAppError::Http(e.to_string()))?;
    Ok(serde_json::from_str(&raw).unwrap_or_else(|_| serde_json::json!({ "raw": raw })))
}

#[async_trait]
impl WhatsAppApi for CloudApiClient {
    async fn send_message(
        &self,
        to: &str,
        content: &str,
        kind: MessageKind,
    ) -> Result<Value, WhatsAppError> {
        let envelope = OutboundEnvelope::new(to, content, kind);
        let res = self
            .http
            .post(self.messages_url())
            .bearer_auth(&self.access_token)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| WhatsAppError::Http(e.to_string()))?;

        let raw = into_json(res).await?;

        let message_id = raw
            .get("messages")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|m| m.get("id"))
            .and_then(|v| v.as_str());
        if let Some(id) = message_id {
            info!(to = %to, message_id = %id, kind = %kind.as_str(), "message sent");
        }

        Ok(raw)
    }

    async fn message_status(&self, message_id: &str) -> Result<Value, WhatsAppError> {
        let res = self
            .http
            .get(self.node_url(message_id))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "status,timestamp")])
            .send()
            .await
            .map_err(|e| WhatsAppError::Http(e.to_string()))?;

        into_json(res).await
    }

    async fn mark_as_read(&self, message_id: &str) -> Result<Value, WhatsAppError> {
        let receipt = ReadReceipt {
            messaging_product: MESSAGING_PRODUCT,
            status: "read",
            message_id,
        };
        let res = self
            .http
            .post(self.messages_url())
            .bearer_auth(&self.access_token)
            .json(&receipt)
            .send()
            .await
            .map_err(|e| WhatsAppError::Http(e.to_string()))?;

        into_json(res).await
    }

    async fn phone_number_info(&self) -> Result<Value, WhatsAppError> {
        let res = self
            .http
            .get(self.node_url(&self.phone_number_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| WhatsAppError::Http(e.to_string()))?;

        into_json(res).await
    }

    fn verify_webhook_token(&self, token: &str) -> bool {
        token == self.verify_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CloudApiClient {
        CloudApiClient::new(
            "https://graph.example.test/v18.0/",
            "12345",
            "token",
            "verify-secret",
        )
    }

    #[test]
    fn urls_trim_trailing_slash() {
        let client = client();
        assert_eq!(
            client.messages_url(),
            "https://graph.example.test/v18.0/12345/messages"
        );
        assert_eq!(
            client.node_url("wamid.abc"),
            "https://graph.example.test/v18.0/wamid.abc"
        );
    }

    #[test]
    fn text_envelope_embeds_body() {
        let envelope =
            serde_json::to_value(OutboundEnvelope::new("+15550001111", "hello", MessageKind::Text))
                .unwrap();
        assert_eq!(envelope["messaging_product"], "whatsapp");
        assert_eq!(envelope["to"], "+15550001111");
        assert_eq!(envelope["type"], "text");
        assert_eq!(envelope["text"]["body"], "hello");
        assert!(envelope.get("image").is_none());
        assert!(envelope.get("document").is_none());
    }

    #[test]
    fn image_envelope_references_link() {
        let envelope = serde_json::to_value(OutboundEnvelope::new(
            "+15550001111",
            "https://cdn.example/pic.jpg",
            MessageKind::Image,
        ))
        .unwrap();
        assert_eq!(envelope["type"], "image");
        assert_eq!(envelope["image"]["link"], "https://cdn.example/pic.jpg");
        assert!(envelope.get("text").is_none());
    }

    #[test]
    fn document_envelope_references_link() {
        let envelope = serde_json::to_value(OutboundEnvelope::new(
            "+15550001111",
            "https://cdn.example/file.pdf",
            MessageKind::Document,
        ))
        .unwrap();
        assert_eq!(envelope["type"], "document");
        assert_eq!(envelope["document"]["link"], "https://cdn.example/file.pdf");
        assert!(envelope.get("text").is_none());
    }

    #[test]
    fn read_receipt_shape() {
        let receipt = serde_json::to_value(ReadReceipt {
            messaging_product: MESSAGING_PRODUCT,
            status: "read",
            message_id: "wamid.abc",
        })
        .unwrap();
        assert_eq!(receipt["messaging_product"], "whatsapp");
        assert_eq!(receipt["status"], "read");
        assert_eq!(receipt["message_id"], "wamid.abc");
    }

    #[test]
    fn webhook_token_is_compared_for_equality() {
        let client = client();
        assert!(client.verify_webhook_token("verify-secret"));
        assert!(!client.verify_webhook_token("wrong"));
        assert!(!client.verify_webhook_token(""));
    }
}
