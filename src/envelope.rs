//! Uniform result envelope.
//!
//! Every tool call returns exactly one `Envelope`, win or fail. Raw errors
//! never cross the middleware boundary: recognized kinds carry their mapped
//! status code and message, anything else degrades to a generic 500 with the
//! detail logged server-side only.

use crate::types::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope outcome marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Uniform response shape for every tool call outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub status_code: u16,
    pub message: String,
    pub data: Option<Value>,
}

impl Envelope {
    /// Success envelope; the message is conventionally the tool's name.
    pub fn success(tool_name: &str, data: Value) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            status_code: 200,
            message: tool_name.to_string(),
            data: Some(data),
        }
    }

    /// Error envelope from a typed error. Unrecognized kinds (I/O, transport,
    /// serialization, internal) are logged and replaced by a generic message
    /// so no internal detail reaches the caller.
    pub fn from_error(err: &Error) -> Self {
        let message = if err.is_recognized() {
            err.to_string()
        } else {
            tracing::error!(error = %err, "tool call failed");
            "Internal server error".to_string()
        };

        Self {
            status: EnvelopeStatus::Error,
            status_code: err.status_code(),
            message,
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn success_envelope_carries_tool_name_and_data() {
        let envelope = Envelope::success("get_order", json!({"id": 42}));
        assert!(envelope.is_success());
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.message, "get_order");
        assert_eq!(envelope.data, Some(json!({"id": 42})));
    }

    #[test]
    fn recognized_errors_keep_their_message() {
        let envelope = Envelope::from_error(&Error::bad_request("No context provided, BAD REQUEST"));
        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.message, "No context provided, BAD REQUEST");
        assert_eq!(envelope.data, None);
    }

    #[test]
    fn unrecognized_errors_degrade_to_generic_500() {
        let envelope = Envelope::from_error(&Error::internal("secret backend detail"));
        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message, "Internal server error");
    }

    #[test]
    fn upstream_status_passes_through() {
        let envelope =
            Envelope::from_error(&Error::upstream(404, "Failed to fetch product sku-1, statuscode: 404"));
        assert_eq!(envelope.status_code, 404);
        assert!(envelope.message.contains("statuscode: 404"));
    }

    #[test]
    fn wire_shape_matches_contract() {
        let envelope = Envelope::success("ping", json!("pong"));
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            wire,
            json!({
                "status": "success",
                "status_code": 200,
                "message": "ping",
                "data": "pong",
            })
        );
    }
}
