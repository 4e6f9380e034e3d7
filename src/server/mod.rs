//! Tool dispatch.
//!
//! Resolves a tool by name and runs it behind the middleware. Every outcome,
//! including an unknown tool, is an envelope.

use crate::envelope::Envelope;
use crate::middleware::ToolMiddleware;
use crate::tools::ToolRegistry;
use crate::types::Error;
use serde::Deserialize;
use serde_json::Value;

/// A single inbound tool call.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallRequest {
    pub tool: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub context: Option<Value>,
}

/// Registry + middleware behind one dispatch entry point.
#[derive(Debug)]
pub struct ToolServer {
    registry: ToolRegistry,
    middleware: ToolMiddleware,
}

impl ToolServer {
    pub fn new(registry: ToolRegistry, middleware: ToolMiddleware) -> Self {
        Self {
            registry,
            middleware,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch one call to its handler through the middleware.
    pub async fn dispatch(&self, request: ToolCallRequest) -> Envelope {
        let Some(handler) = self.registry.get(&request.tool) else {
            return Envelope::from_error(&Error::not_found(format!(
                "Unknown tool: {}",
                request.tool
            )));
        };

        self.middleware
            .invoke(handler.as_ref(), request.params, request.context)
            .await
    }
}
