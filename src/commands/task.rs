//! Task Commands

use serde::de::IgnoredAny;

use super::{segment, RestClient};
use crate::error::ApiError;
use crate::models::{CreatedTask, Task, TaskDraft, TaskListResponse};

pub async fn list_tasks(api: &RestClient) -> Result<Vec<Task>, ApiError> {
    let response: TaskListResponse = api.get("/tasks", true).await?;
    Ok(response.into_tasks())
}

/// Returns the stored record when the server echoes it with an id
pub async fn create_task(api: &RestClient, draft: &TaskDraft) -> Result<Option<Task>, ApiError> {
    let response: CreatedTask = api.post("/tasks", draft, true).await?;
    Ok(response.into_task())
}

pub async fn update_task(api: &RestClient, id: &str, draft: &TaskDraft) -> Result<(), ApiError> {
    let _: IgnoredAny = api.put(&format!("/tasks/{}", segment(id)), draft, true).await?;
    Ok(())
}

pub async fn delete_task(api: &RestClient, id: &str) -> Result<(), ApiError> {
    let _: IgnoredAny = api.del(&format!("/tasks/{}", segment(id)), true).await?;
    Ok(())
}
