use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// WhatsApp Cloud API configuration
    pub whatsapp: WhatsAppConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listen host (default: 0.0.0.0)
    pub host: String,
    /// Listen port (default: 3000)
    pub port: u16,
}

/// WhatsApp Cloud API configuration.
///
/// All fields are required; there is no baked-in provider endpoint or
/// credential, so loading fails until each is supplied via a config
/// file or `WASHIELD__WHATSAPP__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct WhatsAppConfig {
    /// Graph API base URL, e.g. `https://graph.facebook.com/v18.0`
    pub api_url: String,
    /// Identifier of the sending phone number
    pub phone_number_id: String,
    /// Bearer access credential
    pub access_token: String,
    /// Shared secret for the webhook subscription handshake
    pub verify_token: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: json or pretty (default: json)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Defaults for everything that has one; the whatsapp section
            // deliberately has none
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            // Add configuration file based on environment
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local configuration file (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with WASHIELD_)
            .add_source(Environment::with_prefix("WASHIELD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
