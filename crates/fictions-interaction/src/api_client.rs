//! ApiClient - JSON-over-HTTP access to the fictions backend.
//!
//! Every request carries `Content-Type: application/json`. Requests outside the
//! authentication namespace also carry `Authorization: Bearer <token>` when the
//! session store holds a token. The client reads the token on every call and
//! never writes to the session store.

use fictions_core::config::ClientConfig;
use fictions_core::session::SessionStore;
use fictions_core::{FictionsError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Paths under this prefix are sent without credentials.
pub const AUTH_NAMESPACE: &str = "/api/auth/";

/// HTTP client bound to one backend and one session store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_store: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client for `config.base_url` with `config.timeout_secs` per request.
    pub fn new(config: &ClientConfig, session_store: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FictionsError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request and decodes the JSON body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - `FictionsError::Request`: non-2xx status; the message is the body's
    ///   `detail` field or `HTTP <status>`
    /// - `FictionsError::Transport`: no response, or a 2xx body that does not decode as `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        let mut with_token = false;
        if !is_auth_path(path) {
            if let Some(token) = self.session_store.token() {
                request = request.bearer_auth(token);
                with_token = true;
            }
        }

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        tracing::debug!(%method, path, with_token, "Sending API request");

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            let message = extract_error_message(status.as_u16(), &text);
            tracing::warn!(
                status = status.as_u16(),
                %method,
                path,
                "API request rejected: {}",
                message
            );
            return Err(FictionsError::request(status.as_u16(), message));
        }

        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(payload).map_err(|e| {
            FictionsError::transport(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(&body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(&body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, None).await
    }

    fn transport_error(&self, e: &reqwest::Error) -> FictionsError {
        if e.is_timeout() {
            FictionsError::transport(format!("Request to {} timed out", self.base_url))
        } else if e.is_connect() {
            FictionsError::transport(format!("Could not connect to {}", self.base_url))
        } else {
            FictionsError::transport(e.to_string())
        }
    }
}

fn is_auth_path(path: &str) -> bool {
    path.starts_with(AUTH_NAMESPACE)
}

/// Builds a display-ready message from an error response body.
///
/// Uses the `detail` field when it is a string, or the joined `msg` entries
/// when it is a list of field errors; anything else yields `HTTP <status>`.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let fallback = || format!("HTTP {}", status);

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    match value.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                fallback()
            } else {
                messages.join("; ")
            }
        }
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string_is_used() {
        assert_eq!(
            extract_error_message(401, r#"{"detail":"Invalid email or password"}"#),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_field_errors_are_joined() {
        let body = r#"{"detail":[
            {"loc":["body","title"],"msg":"String is too long"},
            {"msg":"Field required"}
        ]}"#;
        assert_eq!(
            extract_error_message(422, body),
            "String is too long; Field required"
        );
    }

    #[test]
    fn test_fallback_to_status() {
        assert_eq!(extract_error_message(502, "<html>Bad Gateway</html>"), "HTTP 502");
        assert_eq!(extract_error_message(500, ""), "HTTP 500");
        assert_eq!(extract_error_message(400, r#"{"error":"nope"}"#), "HTTP 400");
        assert_eq!(extract_error_message(400, r#"{"detail":""}"#), "HTTP 400");
        assert_eq!(extract_error_message(400, r#"{"detail":42}"#), "HTTP 400");
    }

    #[test]
    fn test_auth_namespace() {
        assert!(is_auth_path("/api/auth/login"));
        assert!(is_auth_path("/api/auth/register"));
        assert!(!is_auth_path("/api/fictions/"));
        assert!(!is_auth_path("/api/authors/"));
    }
}
