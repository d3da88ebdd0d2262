/// Support request endpoints (Admin, Project Manager)
///
/// New requests always start as "Pending"; the only update is a status change.

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
        support_request::{CreateSupportRequest, SupportRequest},
    },
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SupportRequestBody {
    #[validate(length(min = 1, max = 100, message = "Request type must be 1-100 characters"))]
    pub request_type: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "Requested by must be 1-100 characters"))]
    pub requested_by: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdate {
    #[validate(length(min = 1, max = 50, message = "Status must be 1-50 characters"))]
    pub status: String,
}

pub async fn list_support_requests(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<SupportRequest>>> {
    Ok(Json(SupportRequest::list_by_project(&state.db, project_id).await?))
}

pub async fn create_support_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    ApiJson(req): ApiJson<SupportRequestBody>,
) -> ApiResult<(StatusCode, Json<SupportRequest>)> {
    req.validate()?;

    if Project::find_by_id(&state.db, project_id).await?.is_none() {
        return Err(ApiError::not_found("Project"));
    }

    let request = SupportRequest::create(
        &state.db,
        CreateSupportRequest {
            project_id,
            request_type: req.request_type,
            description: req.description,
            requested_by: req.requested_by,
        },
    )
    .await?;

    info!(
        request_id = %request.id,
        project_id = %project_id,
        user_id = %auth.user_id,
        "Support request filed"
    );
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn update_support_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<StatusUpdate>,
) -> ApiResult<Json<SupportRequest>> {
    req.validate()?;

    let request = SupportRequest::update_status(&state.db, id, &req.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Support request"))?;

    info!(request_id = %id, status = %request.status, user_id = %auth.user_id, "Support request updated");
    Ok(Json(request))
}
