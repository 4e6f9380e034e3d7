//! # Commerce MCP Gateway
//!
//! MCP-style tool gateway forwarding to the commerce backends (inventory,
//! order). Every tool call runs behind one uniform middleware chain:
//!
//! ```text
//!   call → context validation → trace attach → token verify → scope check
//!        → handler → success/error envelope → trace detach (always)
//! ```
//!
//! - Bearer tokens are verified with RS256 against a public key loaded once
//!   at startup.
//! - The active trace context and request id are task-local per call, so
//!   concurrent calls never observe each other's state.
//! - Every outcome is a uniform envelope; raw faults never reach the caller.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod envelope;
pub mod middleware;
pub mod server;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use envelope::{Envelope, EnvelopeStatus};
pub use middleware::{CallContext, Claims, TokenAuthenticator, ToolMiddleware};
pub use server::{ToolCallRequest, ToolServer};
pub use tools::{ToolHandler, ToolRegistry};
pub use types::{Config, Error, Result};
