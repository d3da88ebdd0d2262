/// Customer interaction endpoints (Admin, Sales)
///
/// Interactions take a JSON body. Attachments are referenced by
/// `file_path`; storing the file itself happens elsewhere.

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
        interaction::{CreateInteraction, Interaction, InteractionType},
    },
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct InteractionRequest {
    pub interaction_type: InteractionType,
    pub details: Option<String>,

    #[validate(length(max = 255, message = "File path must be at most 255 characters"))]
    pub file_path: Option<String>,
}

pub async fn list_interactions(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Interaction>>> {
    Ok(Json(Interaction::list_by_customer(&state.db, customer_id).await?))
}

pub async fn create_interaction(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(customer_id): Path<Uuid>,
    ApiJson(req): ApiJson<InteractionRequest>,
) -> ApiResult<(StatusCode, Json<Interaction>)> {
    req.validate()?;

    if Customer::find_by_id(&state.db, customer_id).await?.is_none() {
        return Err(ApiError::not_found("Customer"));
    }

    let interaction = Interaction::create(
        &state.db,
        CreateInteraction {
            customer_id,
            interaction_type: req.interaction_type,
            details: req.details,
            file_path: req.file_path,
        },
    )
    .await?;

    info!(
        customer_id = %customer_id,
        interaction_id = %interaction.id,
        user_id = %auth.user_id,
        "Interaction recorded"
    );
    Ok((StatusCode::CREATED, Json(interaction)))
}
