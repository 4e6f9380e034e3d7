//! Shared types — configuration and error handling.

pub mod config;
pub mod errors;

pub use config::{AuthConfig, BackendConfig, Config, ObservabilityConfig, ServerConfig};
pub use errors::{Error, Result};
