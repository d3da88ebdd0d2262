/// Communication log endpoints (Admin, Sales)

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
    models::communication::{CommunicationRecord, CreateCommunication},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CommunicationRequest {
    pub customer_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "Contact type must be 1-50 characters"))]
    pub contact_type: String,

    #[validate(length(min = 1, message = "Details are required"))]
    pub details: String,
}

pub async fn list_communications(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CommunicationRecord>>> {
    Ok(Json(CommunicationRecord::list(&state.db).await?))
}

pub async fn create_communication(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<CommunicationRequest>,
) -> ApiResult<(StatusCode, Json<CommunicationRecord>)> {
    req.validate()?;

    let record = CommunicationRecord::create(
        &state.db,
        CreateCommunication {
            customer_id: req.customer_id,
            contact_type: req.contact_type,
            details: req.details,
        },
    )
    .await?;

    info!(
        record_id = %record.id,
        customer_id = %record.customer_id,
        user_id = %auth.user_id,
        "Communication recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_communication(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if !CommunicationRecord::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Communication record"));
    }

    info!(record_id = %id, user_id = %auth.user_id, "Communication record deleted");
    Ok(Json(serde_json::json!({ "message": "Communication record deleted successfully" })))
}
