/// Customer endpoints
///
/// Reads are open to every role. Writes need Admin or Sales and are checked
/// in the handler, since the route group admits Project Managers for reads.

use crate::{
    app::{AppState, SALES_TEAM},
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
    models::customer::{CreateCustomer, Customer, UpdateCustomer},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub phone: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub sales_stage: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CustomerUpdateRequest {
    #[validate(length(min = 1, max = 255, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub sales_stage: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub tags: Option<String>,
    pub decision_maker: Option<String>,
    pub technical_evaluator: Option<String>,
}

pub async fn list_customers(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(Customer::list(&state.db).await?))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Customer>> {
    let customer = Customer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer"))?;

    Ok(Json(customer))
}

pub async fn create_customer(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<CustomerRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    auth.require(SALES_TEAM)?;
    req.validate()?;

    let customer = Customer::create(
        &state.db,
        CreateCustomer {
            name: req.name,
            email: req.email,
            phone: req.phone,
            company: req.company,
            industry: req.industry,
            sales_stage: req.sales_stage,
            address: req.address,
            location: req.location,
            tags: req.tags,
        },
    )
    .await?;

    info!(customer_id = %customer.id, user_id = %auth.user_id, "Customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Partial update; omitted fields keep their value
pub async fn update_customer(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CustomerUpdateRequest>,
) -> ApiResult<Json<Customer>> {
    auth.require(SALES_TEAM)?;
    req.validate()?;

    let customer = Customer::update(
        &state.db,
        id,
        UpdateCustomer {
            name: req.name,
            email: req.email,
            phone: req.phone,
            company: req.company,
            industry: req.industry,
            sales_stage: req.sales_stage,
            address: req.address,
            location: req.location,
            tags: req.tags,
            decision_maker: req.decision_maker,
            technical_evaluator: req.technical_evaluator,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Customer"))?;

    info!(customer_id = %id, user_id = %auth.user_id, "Customer updated");
    Ok(Json(customer))
}

/// Deletes a customer and everything attached to it
pub async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    auth.require(SALES_TEAM)?;

    if !Customer::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Customer"));
    }

    info!(customer_id = %id, user_id = %auth.user_id, "Customer deleted");
    Ok(Json(serde_json::json!({ "message": "Customer deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_request_validation() {
        let req: CustomerRequest = serde_json::from_value(serde_json::json!({
            "name": "Acme",
            "email": "ops@acme.example",
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let req: CustomerRequest = serde_json::from_value(serde_json::json!({
            "name": "",
            "email": "acme",
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_empty_update_is_valid() {
        let req: CustomerUpdateRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
    }
}
