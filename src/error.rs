//! Error Types
//!
//! Failures surfaced by the REST client and the view router.

use thiserror::Error;

/// Error returned by every REST call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No token stored for an authenticated request
    #[error("Authentication required")]
    AuthRequired,

    /// Non-2xx response
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not the expected JSON
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Missing token or a 401 from the server
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::AuthRequired) || self.status() == Some(401)
    }

    pub fn is_server(&self) -> bool {
        self.status().is_some_and(|s| s >= 500)
    }
}

/// Error raised while loading a view
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouterError {
    #[error("No se pudo cargar views/{view}.html: {reason}")]
    FragmentFetch { view: String, reason: String },

    #[error("Mount node #app not found")]
    MountMissing,

    #[error("No setup registered for view '{0}'")]
    ViewNotRegistered(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl From<wasm_bindgen::JsValue> for RouterError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        RouterError::Dom(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_displays_server_message() {
        let err = ApiError::Status { status: 423, message: "Cuenta bloqueada".into() };
        assert_eq!(err.to_string(), "Cuenta bloqueada");
        assert_eq!(err.status(), Some(423));
        assert!(!err.is_auth());
    }

    #[test]
    fn test_auth_detection() {
        assert!(ApiError::AuthRequired.is_auth());
        assert_eq!(ApiError::AuthRequired.to_string(), "Authentication required");
        assert!(ApiError::Status { status: 401, message: "x".into() }.is_auth());
        assert!(ApiError::Status { status: 503, message: "x".into() }.is_server());
        assert!(!ApiError::Network("offline".into()).is_auth());
    }
}
