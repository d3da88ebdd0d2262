/// Project endpoints (Admin, Project Manager)
///
/// Projects can be created either at `/projects` with a `customer_id` in the
/// body or at `/projects/customers/:customer_id`.

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
use crm_shared::{
    auth::guard::AuthContext,
    models::{
        customer::Customer,
        project::{CreateProject, Project},
    },
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Project fields shared by both create routes
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectFields {
    #[validate(length(min = 1, max = 200, message = "Project name must be 1-200 characters"))]
    pub project_name: String,

    pub budget: Option<f64>,

    #[validate(length(max = 100, message = "Phase must be at most 100 characters"))]
    pub phase: Option<String>,

    #[validate(length(max = 100, message = "Manager must be at most 100 characters"))]
    pub manager: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub customer_id: Uuid,

    #[serde(flatten)]
    pub project: ProjectFields,
}

pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(Project::list(&state.db).await?))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;

    Ok(Json(project))
}

pub async fn list_customer_projects(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(Project::list_by_customer(&state.db, customer_id).await?))
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    insert_project(&state, auth, req.customer_id, req.project).await
}

pub async fn create_customer_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(customer_id): Path<Uuid>,
    ApiJson(fields): ApiJson<ProjectFields>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    insert_project(&state, auth, customer_id, fields).await
}

async fn insert_project(
    state: &AppState,
    auth: AuthContext,
    customer_id: Uuid,
    fields: ProjectFields,
) -> ApiResult<(StatusCode, Json<Project>)> {
    fields.validate()?;

    if Customer::find_by_id(&state.db, customer_id).await?.is_none() {
        return Err(ApiError::not_found("Customer"));
    }

    let project = Project::create(
        &state.db,
        CreateProject {
            customer_id,
            project_name: fields.project_name,
            budget: fields.budget,
            phase: fields.phase,
            manager: fields.manager,
        },
    )
    .await?;

    info!(
        project_id = %project.id,
        customer_id = %customer_id,
        user_id = %auth.user_id,
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// Deletes a project with its tasks, support requests and update logs
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if !Project::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Project"));
    }

    info!(project_id = %id, user_id = %auth.user_id, "Project deleted");
    Ok(Json(serde_json::json!({ "message": "Project deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_request_flattens_fields() {
        let customer_id = Uuid::new_v4();
        let req: ProjectRequest = serde_json::from_value(serde_json::json!({
            "customer_id": customer_id,
            "project_name": "Warehouse rollout",
            "budget": 125000.0,
            "phase": "Planning",
        }))
        .unwrap();

        assert_eq!(req.customer_id, customer_id);
        assert_eq!(req.project.project_name, "Warehouse rollout");
        assert_eq!(req.project.budget, Some(125000.0));
        assert!(req.project.manager.is_none());
        assert!(req.project.validate().is_ok());
    }
}
