/// Dashboard statistics (any role)
///
/// ```text
/// GET /dashboard-stats
/// ```
///
/// ```json
/// { "totalCustomers": 42, "pendingFunding": 3, "recentInteractions": 118, "activeDeals": 37 }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use crm_shared::models::{
    customer::Customer, funding::FundingInformation, interaction::Interaction,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_customers: i64,

    /// Funding records with status "Pending"
    pub pending_funding: i64,

    /// All recorded interactions
    pub recent_interactions: i64,

    /// Customers whose sales stage isn't "Lost"
    pub active_deals: i64,
}

pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let (total_customers, pending_funding, recent_interactions, active_deals) = futures::try_join!(
        Customer::count(&state.db),
        FundingInformation::count_pending(&state.db),
        Interaction::count(&state.db),
        Customer::count_active(&state.db),
    )?;

    Ok(Json(DashboardStats {
        total_customers,
        pending_funding,
        recent_interactions,
        active_deals,
    }))
}
