//! Trace-context bridge.
//!
//! Carries the active OpenTelemetry context and the request id across the
//! asynchronous call boundary. Both live in a tokio task-local established
//! per call, never in a process global, so concurrent calls cannot observe
//! each other's state and no locking is needed.
//!
//! `attach` returns a [`TraceToken`] that restores the previous context when
//! consumed by [`detach`] — or on drop, which covers cancellation and panic
//! paths without a separate cleanup hook.

use crate::middleware::context::REQUEST_ID_FALLBACK;
use opentelemetry::propagation::Injector;
use opentelemetry::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

tokio::task_local! {
    /// Per-call slot: one instance per in-flight tool call.
    static CALL_SCOPE: CallScope;
}

/// Per-call state established by [`scope`].
#[derive(Debug)]
struct CallScope {
    request_id: String,
    active: RefCell<Context>,
}

/// Opaque handle to the previously active trace context.
///
/// Move-only: `detach` consumes it, so it cannot be released twice. If the
/// call is cancelled or unwinds before the explicit detach, `Drop` performs
/// the same restoration.
#[must_use = "dropping the token without detach still restores, but detach should be explicit"]
#[derive(Debug)]
pub struct TraceToken {
    prev: Option<Context>,
}

impl Drop for TraceToken {
    fn drop(&mut self) {
        if let Some(prev) = self.prev.take() {
            let _ = CALL_SCOPE.try_with(|call| {
                call.active.replace(prev);
            });
        }
    }
}

/// Run `fut` inside a fresh call scope carrying `request_id`.
///
/// The scope is torn down when the future completes or is dropped, so nothing
/// set inside it can leak into another call.
pub async fn scope<F>(request_id: String, fut: F) -> F::Output
where
    F: Future,
{
    CALL_SCOPE
        .scope(
            CallScope {
                request_id,
                active: RefCell::new(Context::new()),
            },
            fut,
        )
        .await
}

/// Request id of the current call, or the sentinel outside any call scope.
pub fn request_id() -> String {
    CALL_SCOPE
        .try_with(|call| call.request_id.clone())
        .unwrap_or_else(|_| REQUEST_ID_FALLBACK.to_string())
}

/// Build a trace context from a flattened string carrier via the global
/// propagator. Never fails: an absent or malformed carrier yields a root
/// context with no parent.
pub fn extract(carrier: &HashMap<String, String>) -> Context {
    opentelemetry::global::get_text_map_propagator(|propagator| propagator.extract(carrier))
}

/// Make `cx` the active context for the current call, returning a token
/// holding the previously active one.
pub fn attach(cx: Context) -> TraceToken {
    let prev = CALL_SCOPE.try_with(|call| call.active.replace(cx)).ok();
    TraceToken { prev }
}

/// Restore the context captured by `token`. Consumes the token, so each
/// attach is released exactly once.
pub fn detach(token: TraceToken) {
    drop(token);
}

/// The currently active trace context for this call.
pub fn active() -> Context {
    CALL_SCOPE
        .try_with(|call| call.active.borrow().clone())
        .unwrap_or_else(|_| Context::new())
}

struct HeaderCarrier<'a>(&'a mut HeaderMap);

impl Injector for HeaderCarrier<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            self.0.insert(name, value);
        }
    }
}

/// Inject the active context into outbound request headers via the global
/// propagator, so backend spans join the caller's trace.
pub fn inject(headers: &mut HeaderMap) {
    let cx = active();
    opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeaderCarrier(headers));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{TraceContextExt, TraceId};

    const TRACEPARENT: &str = "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01";

    fn carrier() -> HashMap<String, String> {
        HashMap::from([("traceparent".to_string(), TRACEPARENT.to_string())])
    }

    fn trace_id(cx: &Context) -> TraceId {
        cx.span().span_context().trace_id()
    }

    #[test]
    fn extract_of_empty_carrier_is_root_context() {
        crate::observability::init_propagator();
        let cx = extract(&HashMap::new());
        assert!(!cx.span().span_context().is_valid());
    }

    #[test]
    fn extract_parses_w3c_traceparent() {
        crate::observability::init_propagator();
        let cx = extract(&carrier());
        assert_eq!(
            trace_id(&cx),
            TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap()
        );
    }

    #[tokio::test]
    async fn attach_and_detach_swap_the_active_context() {
        crate::observability::init_propagator();
        scope("req-1".to_string(), async {
            assert!(!active().span().span_context().is_valid());

            let token = attach(extract(&carrier()));
            assert!(active().span().span_context().is_valid());

            detach(token);
            assert!(!active().span().span_context().is_valid());
        })
        .await;
    }

    #[tokio::test]
    async fn dropping_the_token_restores_like_detach() {
        crate::observability::init_propagator();
        scope("req-2".to_string(), async {
            {
                let _token = attach(extract(&carrier()));
                assert!(active().span().span_context().is_valid());
            }
            assert!(!active().span().span_context().is_valid());
        })
        .await;
    }

    #[tokio::test]
    async fn request_id_is_call_scoped() {
        assert_eq!(request_id(), REQUEST_ID_FALLBACK);
        scope("abc-123".to_string(), async {
            assert_eq!(request_id(), "abc-123");
        })
        .await;
        assert_eq!(request_id(), REQUEST_ID_FALLBACK);
    }

    #[test]
    fn attach_outside_a_scope_is_inert() {
        crate::observability::init_propagator();
        let token = attach(extract(&carrier()));
        detach(token);
    }

    #[tokio::test]
    async fn inject_writes_traceparent_header() {
        crate::observability::init_propagator();
        scope("req-3".to_string(), async {
            let _token = attach(extract(&carrier()));
            let mut headers = HeaderMap::new();
            inject(&mut headers);
            let injected = headers.get("traceparent").unwrap().to_str().unwrap();
            assert!(injected.contains("0af7651916cd43dd8448eb211c80319c"));
        })
        .await;
    }
}
