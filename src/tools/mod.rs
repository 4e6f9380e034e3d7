//! Tool infrastructure — handler trait, registry, backend client, and the
//! built-in commerce tools.
//!
//! Handlers only build outbound requests and parse backend responses; every
//! gate (context, trace, token, scope) runs in the middleware before a
//! handler is invoked.

pub mod client;
pub mod info;
pub mod inventory;
pub mod order;

use crate::middleware::context::CallContext;
use crate::types::{Config, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use client::BackendClient;

/// An invocable tool.
///
/// `call` runs inside the call scope, so `middleware::trace::request_id()`
/// and the active trace context are available without extra parameters.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tool name as exposed to callers (also the success-envelope message).
    fn name(&self) -> &'static str;

    /// Scope a token must carry to invoke this tool. `None` admits any
    /// verified token.
    fn required_scope(&self) -> Option<&str> {
        None
    }

    /// Whether the call must carry a context mapping.
    fn requires_context(&self) -> bool {
        true
    }

    /// Whether the call must carry a verified credential. Handshake tools
    /// (`ping`, `mcp_info`) opt out.
    fn requires_auth(&self) -> bool {
        true
    }

    async fn call(&self, params: Value, context: &CallContext) -> Result<Value>;
}

/// Name → handler registry, fixed after startup.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: BTreeMap<&'static str, Arc<dyn ToolHandler>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name. Last registration wins.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(handler.name(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.get(name)
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registry with every built-in tool wired to the configured backends.
    pub fn with_builtin_tools(config: &Config) -> Result<Self> {
        let inventory = Arc::new(BackendClient::new(
            &config.backends.inventory_url,
            config.server.session_timeout,
        )?);
        let order = Arc::new(BackendClient::new(
            &config.backends.order_url,
            config.server.session_timeout,
        )?);

        let mut registry = Self::new();
        registry.register(Arc::new(info::PingTool));
        registry.register(Arc::new(info::ServerInfoTool::from_config(config)));
        registry.register(Arc::new(inventory::InventoryHealthTool::new(inventory.clone())));
        registry.register(Arc::new(inventory::CreateInventoryTool::new(inventory.clone())));
        registry.register(Arc::new(inventory::GetProductTool::new(inventory.clone())));
        registry.register(Arc::new(inventory::GetInventoryTool::new(inventory.clone())));
        registry.register(Arc::new(inventory::UpdateInventoryTool::new(inventory)));
        registry.register(Arc::new(order::OrderHealthTool::new(order.clone())));
        registry.register(Arc::new(order::GetOrderTool::new(order.clone())));
        registry.register(Arc::new(order::CheckoutOrderTool::new(order.clone())));
        registry.register(Arc::new(order::CreateOrderTool::new(order)));
        Ok(registry)
    }
}
