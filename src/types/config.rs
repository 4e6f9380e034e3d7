//! Configuration structures.
//!
//! Configuration is loaded from environment variables with sensible defaults
//! for local development.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Global gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server identity and timeouts.
    #[serde(default)]
    pub server: ServerConfig,

    /// Backend service base URLs.
    #[serde(default)]
    pub backends: BackendConfig,

    /// Token verification configuration.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Advertised application name.
    pub app_name: String,

    /// Deployed version tag.
    pub version: String,

    /// Deployment account/environment label.
    pub account: String,

    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Outbound HTTP session timeout.
    #[serde(with = "humantime_serde")]
    pub session_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: "commerce-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            account: "local".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            session_timeout: Duration::from_secs(30),
        }
    }
}

/// Backend service base URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Inventory service base URL.
    pub inventory_url: String,

    /// Order service base URL.
    pub order_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            inventory_url: "http://localhost:7000".to_string(),
            order_url: "http://localhost:7004".to_string(),
        }
    }
}

/// Token verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the PEM-encoded public key used to verify bearer tokens.
    /// Loaded once at startup; failure to load is fatal.
    pub public_key_path: String,

    /// Whether tool calls must carry a context mapping.
    pub require_context: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_key_path: "keys/jwt_public.pem".to_string(),
            require_context: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,

    /// OTLP exporter endpoint (exporter wiring lives outside this crate).
    pub otlp_endpoint: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            otlp_endpoint: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset. Env names match the deployment charts.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(v) = std::env::var("APP_NAME") {
            config.server.app_name = v;
        }
        if let Ok(v) = std::env::var("VERSION") {
            config.server.version = v;
        }
        if let Ok(v) = std::env::var("ACCOUNT") {
            config.server.account = v;
        }
        if let Ok(v) = std::env::var("HOST") {
            config.server.host = v;
        }
        if let Some(port) = env_parsed("PORT") {
            config.server.port = port;
        }
        if let Some(secs) = env_parsed("SESSION_TIMEOUT") {
            config.server.session_timeout = Duration::from_secs(secs);
        }
        if let Ok(v) = std::env::var("INVENTORY_URL") {
            config.backends.inventory_url = v;
        }
        if let Ok(v) = std::env::var("ORDER_URL") {
            config.backends.order_url = v;
        }
        if let Ok(v) = std::env::var("JWT_PUBLIC_KEY_PATH") {
            config.auth.public_key_path = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.observability.log_level = v.to_lowercase();
        }
        if let Ok(v) = std::env::var("LOG_FORMAT") {
            config.observability.json_logs = v.eq_ignore_ascii_case("json");
        }
        if let Ok(v) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
            config.observability.otlp_endpoint = Some(v);
        }

        config
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
