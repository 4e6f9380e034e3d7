//! Per-call middleware orchestration.
//!
//! One wrapper applied uniformly to every tool handler. Gates run in strict
//! order — context validation, trace attach, token verification, scope check,
//! handler — short-circuiting to an error envelope at the first failure. The
//! trace context is detached on every exit path once attached; the handler is
//! never invoked after a failed gate.

use crate::envelope::Envelope;
use crate::middleware::auth::TokenAuthenticator;
use crate::middleware::context::CallContext;
use crate::middleware::{scope, trace};
use crate::tools::ToolHandler;
use crate::types::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Wrapper applying the per-call gates around tool handlers.
#[derive(Debug, Clone)]
pub struct ToolMiddleware {
    authenticator: Arc<TokenAuthenticator>,
    require_context: bool,
}

impl ToolMiddleware {
    pub fn new(authenticator: Arc<TokenAuthenticator>) -> Self {
        Self {
            authenticator,
            require_context: true,
        }
    }

    /// Override the global context requirement (tools may further relax it).
    pub fn require_context(mut self, required: bool) -> Self {
        self.require_context = required;
        self
    }

    /// Run `handler` behind the full gate chain, producing exactly one
    /// envelope.
    pub async fn invoke(
        &self,
        handler: &dyn ToolHandler,
        params: Value,
        context: Option<Value>,
    ) -> Envelope {
        let require_context = self.require_context && handler.requires_context();
        let call_context = match CallContext::validate(context.as_ref(), require_context) {
            Ok(ctx) => ctx,
            // Before attach: nothing to release.
            Err(err) => return Envelope::from_error(&err),
        };

        let request_id = call_context.request_id().to_string();

        trace::scope(request_id, async move {
            let token = trace::attach(trace::extract(&call_context.trace_carrier()));

            let span = tracing::info_span!(
                "tool_call",
                mcp.tool = handler.name(),
                request.id = %trace::request_id(),
            );
            span.set_parent(trace::active());

            let outcome = self
                .gated_call(handler, params, &call_context)
                .instrument(span)
                .await;

            // Always runs before the scope is torn down; the token also
            // restores on drop, covering cancellation mid-handler.
            trace::detach(token);

            match outcome {
                Ok(data) => Envelope::success(handler.name(), data),
                Err(err) => Envelope::from_error(&err),
            }
        })
        .await
    }

    async fn gated_call(
        &self,
        handler: &dyn ToolHandler,
        params: Value,
        context: &CallContext,
    ) -> Result<Value> {
        if handler.requires_auth() {
            let claims = self.authenticator.verify(context.credential())?;
            scope::check(&claims, handler.required_scope())?;
        }
        handler.call(params, context).await
    }
}
