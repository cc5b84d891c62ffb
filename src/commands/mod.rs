//! REST Command Wrappers
//!
//! Frontend bindings to backend endpoints, organized by domain.
//! Every call goes through [`RestClient`], which attaches the bearer token,
//! sends JSON with `mode: cors` + `credentials: include`, and normalizes
//! non-2xx answers into [`ApiError::Status`].

mod auth;
mod task;
mod user;

use gloo_net::http::{Request, RequestBuilder};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::{RequestCredentials, RequestMode};

use crate::error::ApiError;
use crate::session::Session;

// Re-export all public items
pub use auth::*;
pub use task::*;
pub use user::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn builder(self, url: &str) -> RequestBuilder {
        match self {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Delete => Request::delete(url),
        }
    }
}

/// HTTP client bound to the API base URL and the session
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    session: Session,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self { base_url: base_url.into(), session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, requires_auth: bool) -> Result<T, ApiError> {
        self.send(Method::Get, endpoint, None, requires_auth).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        self.send(Method::Post, endpoint, Some(body), requires_auth).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        self.send(Method::Put, endpoint, Some(body), requires_auth).await
    }

    pub async fn del<T: DeserializeOwned>(&self, endpoint: &str, requires_auth: bool) -> Result<T, ApiError> {
        self.send(Method::Delete, endpoint, None, requires_auth).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        let token = bearer(&self.session, requires_auth)?;
        let url = format!("{}{}", self.base_url, endpoint);

        let mut builder = method
            .builder(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .mode(RequestMode::Cors)
            .credentials(RequestCredentials::Include);
        if let Some(token) = token {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = request.send().await.map_err(|e| {
            log::warn!("[API] {:?} {} failed: {}", method, endpoint, e);
            ApiError::Network(e.to_string())
        })?;
        let status = response.status();
        let text = read_body(response.text().await, endpoint)?;

        if !response.ok() {
            log::debug!("[API] {:?} {} -> {}", method, endpoint, status);
            return Err(ApiError::Status { status, message: error_message(status, &text) });
        }
        decode(&text)
    }
}

/// Token to attach, or `AuthRequired` when auth is needed and none is stored
pub fn bearer(session: &Session, requires_auth: bool) -> Result<Option<String>, ApiError> {
    if !requires_auth {
        return Ok(None);
    }
    session.token().map(Some).ok_or(ApiError::AuthRequired)
}

/// Response text; a body that cannot be read is a network failure, never an empty answer
pub fn read_body(text: Result<String, gloo_net::Error>, endpoint: &str) -> Result<String, ApiError> {
    text.map_err(|e| {
        log::warn!("[API] Could not read response of {}: {}", endpoint, e);
        ApiError::Network(e.to_string())
    })
}

/// `message` from a JSON error body, else a generic status line
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

/// Parse a response body; an empty body reads as `null`
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Escape a path segment such as a task id
pub fn segment(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TOKEN_KEY;
    use serde::de::IgnoredAny;

    #[test]
    fn test_bearer_requires_token() {
        let session = Session::memory();
        assert_eq!(bearer(&session, true), Err(ApiError::AuthRequired));
        assert_eq!(bearer(&session, false), Ok(None));
        session.set(TOKEN_KEY, "jwt");
        assert_eq!(bearer(&session, true), Ok(Some("jwt".to_string())));
    }

    #[test]
    fn test_error_message_prefers_server_text() {
        assert_eq!(error_message(400, r#"{"message":"Email ya registrado"}"#), "Email ya registrado");
        assert_eq!(error_message(500, "<html>oops</html>"), "Request failed with status 500");
        assert_eq!(error_message(404, r#"{"error":"x"}"#), "Request failed with status 404");
    }

    #[test]
    fn test_decode_empty_body() {
        let unit: Result<(), _> = decode("");
        assert!(unit.is_ok());
        let ignored: Result<IgnoredAny, _> = decode(r#"{"message":"deleted"}"#);
        assert!(ignored.is_ok());
        let bad: Result<Vec<u32>, _> = decode("{");
        assert!(matches!(bad, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_unreadable_body_is_a_network_error() {
        let failed = read_body(Err(gloo_net::Error::GlooError("stream aborted".into())), "/tasks");
        assert!(matches!(failed, Err(ApiError::Network(ref m)) if m.contains("stream aborted")));
        assert_eq!(read_body(Ok("[]".into()), "/tasks"), Ok("[]".to_string()));
    }

    #[test]
    fn test_segment_escapes_slashes() {
        assert_eq!(segment("a/b"), "a%2Fb");
        assert_eq!(segment("65f0c2"), "65f0c2");
    }
}
