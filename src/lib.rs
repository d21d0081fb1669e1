//! # WA-Shield backend
//!
//! A small HTTP relay in front of the WhatsApp Cloud API.
//!
//! ## Features
//!
//! - **Outbound relay**: forwards text, image and document messages to
//!   the provider's REST API
//! - **Webhook intake**: answers the provider's subscription handshake
//!   and acknowledges inbound message and status events
//! - **Message store**: unpersisted in-memory records with CRUD routes
//! - **Comprehensive configuration**: layered files plus environment
//!   variables
//! - **Observability**: structured logging and request tracing
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wa_cloud::CloudApiClient;
//! use wa_core::MessageStore;
//! use washield::{build_router, AppConfig, AppState};
//!
//! let config = AppConfig::load()?;
//! let client = CloudApiClient::new(
//!     config.whatsapp.api_url.clone(),
//!     config.whatsapp.phone_number_id.clone(),
//!     config.whatsapp.access_token.clone(),
//!     config.whatsapp.verify_token.clone(),
//! );
//! let app = build_router(AppState {
//!     store: Arc::new(MessageStore::new()),
//!     whatsapp: Arc::new(client),
//! });
//! ```

pub mod config;
pub mod http;

pub use config::AppConfig;
pub use http::{build_router, AppState};
