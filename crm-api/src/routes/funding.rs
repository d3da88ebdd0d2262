/// Funding information endpoints (Admin, Sales)
///
/// All routes are keyed by customer:
///
/// ```text
/// GET    /funding/customers/:customer_id
/// POST   /funding/customers/:customer_id
/// PUT    /funding/customers/:customer_id
/// DELETE /funding/customers/:customer_id
/// ```
///
/// Updating a record mirrors `funding_status`, `project_budget`
/// and `decision_maker` onto the customer.

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
        funding::{CreateFunding, FundingInformation, FundingStatus, FundingUpdate, UpdateFunding},
    },
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct FundingRequest {
    pub funding_status: FundingStatus,
    pub project_budget: Option<f64>,
    pub decision_maker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FundingUpdateRequest {
    pub funding_status: Option<FundingStatus>,
    pub project_budget: Option<f64>,
    pub decision_maker: Option<String>,
}

pub async fn get_funding(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> ApiResult<Json<FundingInformation>> {
    let funding = FundingInformation::find_by_customer(&state.db, customer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Funding information"))?;

    Ok(Json(funding))
}

pub async fn create_funding(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(customer_id): Path<Uuid>,
    ApiJson(req): ApiJson<FundingRequest>,
) -> ApiResult<(StatusCode, Json<FundingInformation>)> {
    if Customer::find_by_id(&state.db, customer_id).await?.is_none() {
        return Err(ApiError::not_found("Customer"));
    }

    let funding = FundingInformation::create(
        &state.db,
        CreateFunding {
            customer_id,
            funding_status: req.funding_status,
            project_budget: req.project_budget,
            decision_maker: req.decision_maker,
        },
    )
    .await?;

    info!(
        customer_id = %customer_id,
        funding_id = %funding.id,
        user_id = %auth.user_id,
        "Funding information added"
    );
    Ok((StatusCode::CREATED, Json(funding)))
}

/// Updates the record and syncs the customer in one transaction
pub async fn update_funding(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(customer_id): Path<Uuid>,
    ApiJson(req): ApiJson<FundingUpdateRequest>,
) -> ApiResult<Json<FundingInformation>> {
    let outcome = FundingInformation::update_and_sync(
        &state.db,
        customer_id,
        UpdateFunding {
            funding_status: req.funding_status,
            project_budget: req.project_budget,
            decision_maker: req.decision_maker,
        },
    )
    .await?;

    match outcome {
        FundingUpdate::Updated(funding) => {
            info!(
                customer_id = %customer_id,
                funding_status = ?funding.funding_status,
                user_id = %auth.user_id,
                "Funding information updated"
            );
            Ok(Json(funding))
        }
        FundingUpdate::NoFunding => Err(ApiError::not_found("Funding information")),
        FundingUpdate::NoCustomer => Err(ApiError::not_found("Customer")),
    }
}

pub async fn delete_funding(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(customer_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if !FundingInformation::delete_by_customer(&state.db, customer_id).await? {
        return Err(ApiError::not_found("Funding information"));
    }

    info!(customer_id = %customer_id, user_id = %auth.user_id, "Funding information deleted");
    Ok(Json(serde_json::json!({ "message": "Funding information deleted successfully" })))
}
