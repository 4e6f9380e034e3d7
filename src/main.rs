//! Gateway entry point — newline-delimited JSON over stdio.
//!
//! Reads one tool-call request per line from stdin, writes one envelope per
//! line to stdout. Transport is deliberately thin; all behavior lives in the
//! library.

use commerce_mcp::middleware::{TokenAuthenticator, ToolMiddleware};
use commerce_mcp::server::{ToolCallRequest, ToolServer};
use commerce_mcp::tools::ToolRegistry;
use commerce_mcp::{Config, Envelope, Error};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    commerce_mcp::observability::init_tracing(&config.observability);
    commerce_mcp::observability::init_propagator();

    // The trust anchor is loaded exactly once; a bad key is fatal here, not
    // per-call.
    let public_key = std::fs::read(&config.auth.public_key_path).map_err(|e| {
        Error::internal(format!(
            "cannot read public key {}: {}",
            config.auth.public_key_path, e
        ))
    })?;
    let authenticator = Arc::new(TokenAuthenticator::from_pem(&public_key)?);

    let registry = ToolRegistry::with_builtin_tools(&config)?;
    let middleware =
        ToolMiddleware::new(authenticator).require_context(config.auth.require_context);
    let server = ToolServer::new(registry, middleware);

    tracing::info!(
        app_name = %config.server.app_name,
        version = %config.server.version,
        inventory_url = %config.backends.inventory_url,
        order_url = %config.backends.order_url,
        tools = ?server.registry().tool_names(),
        "gateway starting"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let envelope = match serde_json::from_str::<ToolCallRequest>(&line) {
            Ok(request) => server.dispatch(request).await,
            Err(e) => Envelope::from_error(&Error::bad_request(format!(
                "Invalid request: {}",
                e
            ))),
        };

        let mut out = serde_json::to_vec(&envelope)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
