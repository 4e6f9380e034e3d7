//! Handshake and server-info tools.

use crate::middleware::context::CallContext;
use crate::tools::ToolHandler;
use crate::types::{Config, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Standard MCP handshake/health-check tool.
#[derive(Debug)]
pub struct PingTool;

#[async_trait]
impl ToolHandler for PingTool {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn requires_context(&self) -> bool {
        false
    }

    fn requires_auth(&self) -> bool {
        false
    }

    async fn call(&self, _params: Value, _context: &CallContext) -> Result<Value> {
        tracing::info!("func:ping");
        Ok(json!("pong"))
    }
}

/// Server identity and configuration summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub version: String,
    pub account: String,
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub session_timeout: u64,
    pub product_url: String,
    pub order_url: String,
    pub log_level: String,
}

/// Reports the gateway's own deployment info.
#[derive(Debug)]
pub struct ServerInfoTool {
    info: ServerInfo,
}

impl ServerInfoTool {
    pub fn from_config(config: &Config) -> Self {
        Self {
            info: ServerInfo {
                version: config.server.version.clone(),
                account: config.server.account.clone(),
                app_name: config.server.app_name.clone(),
                host: config.server.host.clone(),
                port: config.server.port,
                session_timeout: config.server.session_timeout.as_secs(),
                product_url: config.backends.inventory_url.clone(),
                order_url: config.backends.order_url.clone(),
                log_level: config.observability.log_level.clone(),
            },
        }
    }
}

#[async_trait]
impl ToolHandler for ServerInfoTool {
    fn name(&self) -> &'static str {
        "mcp_info"
    }

    fn requires_context(&self) -> bool {
        false
    }

    fn requires_auth(&self) -> bool {
        false
    }

    async fn call(&self, _params: Value, _context: &CallContext) -> Result<Value> {
        tracing::info!("func:mcp_info");
        Ok(serde_json::to_value(&self.info)?)
    }
}
