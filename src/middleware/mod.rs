//! Per-call middleware — context validation, trace bridging, token
//! verification, scope authorization, and the orchestrator composing them.
//!
//! Call flow: validate context → attach extracted trace context → verify
//! bearer token → check scopes → invoke handler → envelope; detach always
//! runs once attach has run.

pub mod auth;
pub mod context;
pub mod orchestrator;
pub mod scope;
pub mod trace;

pub use auth::{Claims, TokenAuthenticator};
pub use context::CallContext;
pub use orchestrator::ToolMiddleware;
pub use trace::TraceToken;
