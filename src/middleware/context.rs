//! Call-context validation.
//!
//! The inbound context is a free-form JSON mapping carrying the caller's
//! credential, an optional request id, and an optional flattened trace
//! carrier. Keys are conventions, not a fixed schema.

use crate::types::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Context key holding the bearer credential.
pub const AUTHORIZATION_KEY: &str = "Authorization";

/// Context key holding the caller-supplied request id.
pub const REQUEST_ID_KEY: &str = "x-request-id";

/// Context key holding the flattened trace carrier.
pub const TRACE_CARRIER_KEY: &str = "_trace";

/// Sentinel request id when the caller did not supply one.
pub const REQUEST_ID_FALLBACK: &str = "NOT_INFORMED_BY_AGENT";

/// Validated per-call context mapping.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    fields: Map<String, Value>,
}

impl CallContext {
    /// Validate a raw context value.
    ///
    /// Fails with `BadRequest` if the context is required but absent, or
    /// present but not a mapping. Passes the value through otherwise; an
    /// absent-but-optional context yields an empty mapping.
    pub fn validate(raw: Option<&Value>, require_context: bool) -> Result<CallContext> {
        match raw {
            None | Some(Value::Null) => {
                if require_context {
                    Err(Error::bad_request("No context provided, BAD REQUEST"))
                } else {
                    Ok(CallContext::default())
                }
            }
            Some(Value::Object(fields)) => Ok(CallContext {
                fields: fields.clone(),
            }),
            Some(_) => Err(Error::bad_request("Invalid context, BAD REQUEST")),
        }
    }

    /// Bearer credential, with an optional `Bearer ` prefix stripped.
    pub fn credential(&self) -> Option<&str> {
        let raw = self.fields.get(AUTHORIZATION_KEY)?.as_str()?;
        let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Caller-supplied request id, or the fallback sentinel.
    pub fn request_id(&self) -> &str {
        self.fields
            .get(REQUEST_ID_KEY)
            .and_then(Value::as_str)
            .unwrap_or(REQUEST_ID_FALLBACK)
    }

    /// Flattened string→string trace carrier. Missing or malformed entries
    /// are dropped; an absent carrier yields an empty map.
    pub fn trace_carrier(&self) -> HashMap<String, String> {
        self.fields
            .get(TRACE_CARRIER_KEY)
            .and_then(Value::as_object)
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw field access for tool handlers.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_and_absent_is_bad_request() {
        let err = CallContext::validate(None, true).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "No context provided, BAD REQUEST");

        let err = CallContext::validate(Some(&Value::Null), true).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn optional_and_absent_yields_empty_context() {
        let ctx = CallContext::validate(None, false).unwrap();
        assert!(ctx.credential().is_none());
        assert_eq!(ctx.request_id(), REQUEST_ID_FALLBACK);
    }

    #[test]
    fn non_mapping_context_is_bad_request() {
        for raw in [json!("ctx"), json!(7), json!(["a"]), json!(true)] {
            let err = CallContext::validate(Some(&raw), true).unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.to_string(), "Invalid context, BAD REQUEST");
        }
    }

    #[test]
    fn credential_strips_bearer_prefix() {
        let raw = json!({"Authorization": "Bearer abc.def.ghi"});
        let ctx = CallContext::validate(Some(&raw), true).unwrap();
        assert_eq!(ctx.credential(), Some("abc.def.ghi"));

        let raw = json!({"Authorization": "abc.def.ghi"});
        let ctx = CallContext::validate(Some(&raw), true).unwrap();
        assert_eq!(ctx.credential(), Some("abc.def.ghi"));
    }

    #[test]
    fn empty_credential_is_none() {
        let raw = json!({"Authorization": ""});
        let ctx = CallContext::validate(Some(&raw), true).unwrap();
        assert!(ctx.credential().is_none());

        let raw = json!({"Authorization": "Bearer "});
        let ctx = CallContext::validate(Some(&raw), true).unwrap();
        assert!(ctx.credential().is_none());
    }

    #[test]
    fn request_id_defaults_to_sentinel() {
        let raw = json!({"x-request-id": "abc-123"});
        let ctx = CallContext::validate(Some(&raw), true).unwrap();
        assert_eq!(ctx.request_id(), "abc-123");

        let ctx = CallContext::validate(Some(&json!({})), true).unwrap();
        assert_eq!(ctx.request_id(), REQUEST_ID_FALLBACK);
    }

    #[test]
    fn trace_carrier_drops_non_string_values() {
        let raw = json!({"_trace": {"traceparent": "00-abc-def-01", "bad": 7}});
        let ctx = CallContext::validate(Some(&raw), true).unwrap();
        let carrier = ctx.trace_carrier();
        assert_eq!(carrier.get("traceparent").map(String::as_str), Some("00-abc-def-01"));
        assert!(!carrier.contains_key("bad"));
    }
}
