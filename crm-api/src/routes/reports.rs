/// Reports (Admin only)
///
/// - `GET /reports/sales_summary`: `{"total_sales_opportunities", "total_revenue"}`
/// - `GET /reports/customer_distribution`: `[{"industry", "count"}]`, largest first
/// - `GET /reports/project_budget`: `{"total_projects", "total_budget"}`
///
/// Missing revenue and budget values count as zero.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use crm_shared::models::{
    customer::Customer,
    project::{BudgetSummary, Project},
    sales_opportunity::{SalesOpportunity, SalesSummary},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryCount {
    /// `null` groups customers with no industry set
    pub industry: Option<String>,
    pub count: i64,
}

pub async fn sales_summary(State(state): State<AppState>) -> ApiResult<Json<SalesSummary>> {
    Ok(Json(SalesOpportunity::summary(&state.db).await?))
}

pub async fn customer_distribution(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<IndustryCount>>> {
    let rows = Customer::count_by_industry(&state.db).await?;

    Ok(Json(
        rows.into_iter()
            .map(|(industry, count)| IndustryCount { industry, count })
            .collect(),
    ))
}

pub async fn project_budget(State(state): State<AppState>) -> ApiResult<Json<BudgetSummary>> {
    Ok(Json(Project::budget_summary(&state.db).await?))
}
