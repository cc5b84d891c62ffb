//! Auth Commands

use serde::de::IgnoredAny;
use serde::Serialize;

use super::RestClient;
use crate::error::ApiError;
use crate::models::{AuthResponse, Credentials, PasswordReset, SignupRequest};

#[derive(Serialize)]
struct EmailArgs<'a> {
    email: &'a str,
}

pub async fn login(api: &RestClient, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    api.post("/auth/login", &Credentials { email, password }, false).await
}

/// Returns a session when the server logs the new account in directly
pub async fn signup(api: &RestClient, request: &SignupRequest) -> Result<Option<AuthResponse>, ApiError> {
    let response: serde_json::Value = api.post("/auth/signup", request, false).await?;
    Ok(serde_json::from_value::<AuthResponse>(response).ok().filter(|auth| !auth.token.is_empty()))
}

/// Server-side logout; failures are only logged
pub async fn logout(api: &RestClient) {
    if api.session().token().is_none() {
        return;
    }
    let result: Result<IgnoredAny, _> = api.post("/auth/logout", &serde_json::json!({}), true).await;
    if let Err(e) = result {
        log::debug!("[AUTH] Logout request failed: {}", e);
    }
}

pub async fn forgot_password(api: &RestClient, email: &str) -> Result<(), ApiError> {
    let _: IgnoredAny = api.post("/auth/forgot-password", &EmailArgs { email }, false).await?;
    Ok(())
}

pub async fn reset_password(api: &RestClient, token: &str, new_password: &str) -> Result<(), ApiError> {
    let body = PasswordReset { token, new_password };
    let _: IgnoredAny = api.post("/auth/reset-password", &body, false).await?;
    Ok(())
}
