/// Project update log endpoints (Admin, Project Manager)

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
        project::Project,
        update_log::{CreateUpdateLog, UpdateLog},
    },
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLogRequest {
    #[validate(length(min = 1, max = 100, message = "Change type must be 1-100 characters"))]
    pub change_type: String,

    #[validate(length(min = 1, max = 100, message = "Responsible person must be 1-100 characters"))]
    pub responsible_person: String,

    pub comment: Option<String>,
}

pub async fn list_update_logs(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<UpdateLog>>> {
    Ok(Json(UpdateLog::list_by_project(&state.db, project_id).await?))
}

pub async fn create_update_log(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateLogRequest>,
) -> ApiResult<(StatusCode, Json<UpdateLog>)> {
    req.validate()?;

    if Project::find_by_id(&state.db, project_id).await?.is_none() {
        return Err(ApiError::not_found("Project"));
    }

    let log = UpdateLog::create(
        &state.db,
        CreateUpdateLog {
            project_id,
            change_type: req.change_type,
            responsible_person: req.responsible_person,
            comment: req.comment,
        },
    )
    .await?;

    info!(log_id = %log.id, project_id = %project_id, user_id = %auth.user_id, "Update log added");
    Ok((StatusCode::CREATED, Json(log)))
}
