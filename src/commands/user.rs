//! User Commands
//!
//! Profile endpoints under `/users/me`.

use serde::de::IgnoredAny;

use super::RestClient;
use crate::error::ApiError;
use crate::models::{PasswordChange, ProfileUpdate, User, UserResponse};

pub async fn get_profile(api: &RestClient) -> Result<User, ApiError> {
    let response: UserResponse = api.get("/users/me", true).await?;
    Ok(response.into_user())
}

pub async fn update_profile(api: &RestClient, update: &ProfileUpdate) -> Result<User, ApiError> {
    let response: UserResponse = api.put("/users/me", update, true).await?;
    Ok(response.into_user())
}

pub async fn change_password(api: &RestClient, change: &PasswordChange) -> Result<(), ApiError> {
    let _: IgnoredAny = api.put("/users/me/password", change, true).await?;
    Ok(())
}

pub async fn delete_account(api: &RestClient) -> Result<(), ApiError> {
    let _: IgnoredAny = api.del("/users/me", true).await?;
    Ok(())
}
