/// Project task endpoints (Admin, Project Manager)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use crm_shared::{
    auth::guard::AuthContext,
    models::{
        project::Project,
        task::{CreateTask, Task, UpdateTask},
    },
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: String,

    /// `YYYY-MM-DD`
    pub due_date: NaiveDate,

    pub assigned_to: Option<Uuid>,

    /// Defaults to "Pending"
    #[validate(length(min = 1, max = 50, message = "Status must be 1-50 characters"))]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdateRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: Option<String>,

    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<Uuid>,

    #[validate(length(min = 1, max = 50, message = "Status must be 1-50 characters"))]
    pub status: Option<String>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(Task::list_by_project(&state.db, project_id).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    ApiJson(req): ApiJson<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    if Project::find_by_id(&state.db, project_id).await?.is_none() {
        return Err(ApiError::not_found("Project"));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id,
            description: req.description,
            due_date: req.due_date,
            assigned_to: req.assigned_to,
            status: req.status,
        },
    )
    .await?;

    info!(task_id = %task.id, project_id = %project_id, user_id = %auth.user_id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// Partial update; only fields present in the body change
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<TaskUpdateRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            description: req.description,
            due_date: req.due_date,
            assigned_to: req.assigned_to,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Task"))?;

    info!(task_id = %id, status = %task.status, user_id = %auth.user_id, "Task updated");
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if !Task::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Task"));
    }

    info!(task_id = %id, user_id = %auth.user_id, "Task deleted");
    Ok(Json(serde_json::json!({ "message": "Task deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_request_rejects_bad_date() {
        let result = serde_json::from_value::<TaskRequest>(serde_json::json!({
            "description": "Kickoff",
            "due_date": "31/03/2025",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_task_request_empty_status_fails_validation() {
        let req: TaskRequest = serde_json::from_value(serde_json::json!({
            "description": "Kickoff",
            "due_date": "2025-03-31",
            "status": "",
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
