/// Sales opportunity endpoints (Admin, Sales)

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
    models::sales_opportunity::{
        CreateSalesOpportunity, SalesOpportunity, UpdateSalesOpportunity,
    },
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct OpportunityRequest {
    pub customer_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Opportunity must be 1-100 characters"))]
    pub opportunity: String,

    pub sales_stage: Option<String>,
    pub revenue: Option<f64>,

    /// Owning user; defaults to the caller
    pub owner: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct OpportunityUpdateRequest {
    pub customer_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "Opportunity must be 1-100 characters"))]
    pub opportunity: Option<String>,

    pub sales_stage: Option<String>,
    pub revenue: Option<f64>,
    pub owner: Option<Uuid>,
}

pub async fn list_opportunities(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SalesOpportunity>>> {
    Ok(Json(SalesOpportunity::list(&state.db).await?))
}

pub async fn list_customer_opportunities(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> ApiResult<Json<Vec<SalesOpportunity>>> {
    Ok(Json(SalesOpportunity::list_by_customer(&state.db, customer_id).await?))
}

pub async fn create_opportunity(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<OpportunityRequest>,
) -> ApiResult<(StatusCode, Json<SalesOpportunity>)> {
    req.validate()?;

    let opportunity = SalesOpportunity::create(
        &state.db,
        CreateSalesOpportunity {
            customer_id: req.customer_id,
            opportunity: req.opportunity,
            sales_stage: req.sales_stage,
            revenue: req.revenue,
            owner: req.owner.or(Some(auth.user_id)),
        },
    )
    .await?;

    info!(
        opportunity_id = %opportunity.id,
        customer_id = %opportunity.customer_id,
        user_id = %auth.user_id,
        "Sales opportunity created"
    );
    Ok((StatusCode::CREATED, Json(opportunity)))
}

/// Partial update; only fields present in the body change
pub async fn update_opportunity(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<OpportunityUpdateRequest>,
) -> ApiResult<Json<SalesOpportunity>> {
    req.validate()?;

    let opportunity = SalesOpportunity::update(
        &state.db,
        id,
        UpdateSalesOpportunity {
            customer_id: req.customer_id,
            opportunity: req.opportunity,
            sales_stage: req.sales_stage,
            revenue: req.revenue,
            owner: req.owner,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Sales opportunity"))?;

    info!(opportunity_id = %id, user_id = %auth.user_id, "Sales opportunity updated");
    Ok(Json(opportunity))
}

pub async fn delete_opportunity(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if !SalesOpportunity::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Sales opportunity"));
    }

    info!(opportunity_id = %id, user_id = %auth.user_id, "Sales opportunity deleted");
    Ok(Json(serde_json::json!({ "message": "Sales opportunity deleted successfully" })))
}
