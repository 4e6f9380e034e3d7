//! Backend HTTP client.
//!
//! Thin wrapper over `reqwest` shared by all forwarding tools: re-attaches
//! the caller's bearer credential, forwards the request id, injects the
//! active trace context, and maps non-2xx responses to upstream errors
//! carrying the backend status code.

use crate::middleware::context::CallContext;
use crate::middleware::trace;
use crate::types::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

/// Request-id header forwarded to the backends.
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Client for one backend service.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, session_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(session_timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub async fn get(&self, path: &str, context: &CallContext, action: &str) -> Result<Value> {
        self.send(Method::GET, path, context, None, action).await
    }

    pub async fn post(
        &self,
        path: &str,
        context: &CallContext,
        payload: Value,
        action: &str,
    ) -> Result<Value> {
        self.send(Method::POST, path, context, Some(payload), action).await
    }

    pub async fn put(
        &self,
        path: &str,
        context: &CallContext,
        payload: Value,
        action: &str,
    ) -> Result<Value> {
        self.send(Method::PUT, path, context, Some(payload), action).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        context: &CallContext,
        payload: Option<Value>,
        action: &str,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let headers = self.headers(context)?;

        tracing::info!(url = %url, method = %method, request_id = %trace::request_id(), "backend call");

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(payload) = payload {
            request = request.json(&payload);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(Error::upstream(
                status.as_u16(),
                format!("Failed to {}, statuscode: {}", action, status.as_u16()),
            ))
        }
    }

    fn headers(&self, context: &CallContext) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(token) = context.credential() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::internal("credential is not a valid header value"))?;
            headers.insert(AUTHORIZATION, value);
        }

        let request_id = HeaderValue::from_str(&trace::request_id())
            .map_err(|_| Error::internal("request id is not a valid header value"))?;
        headers.insert(REQUEST_ID_HEADER, request_id);

        trace::inject(&mut headers);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context_with_token() -> CallContext {
        let raw = json!({
            "Authorization": "Bearer tok.en.value",
            "x-request-id": "req-9",
        });
        CallContext::validate(Some(&raw), true).unwrap()
    }

    #[tokio::test]
    async fn headers_carry_bearer_and_request_id() {
        let client = BackendClient::new("http://localhost:7000", Duration::from_secs(5)).unwrap();
        let headers = trace::scope("req-9".to_string(), async move {
            client.headers(&context_with_token()).unwrap()
        })
        .await;

        assert_eq!(
            headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer tok.en.value"
        );
        assert_eq!(
            headers.get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
            "req-9"
        );
    }

    #[tokio::test]
    async fn headers_without_credential_omit_authorization() {
        let client = BackendClient::new("http://localhost:7000", Duration::from_secs(5)).unwrap();
        let headers = client.headers(&CallContext::default()).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(headers.get(REQUEST_ID_HEADER).is_some());
    }
}
