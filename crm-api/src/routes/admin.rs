/// Admin dashboard (Admin only)
///
/// ```text
/// GET /admin/dashboard
/// ```
///
/// ```json
/// { "customers": 42, "projects": 7, "sales": 19 }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use crm_shared::models::{
    customer::Customer, project::Project, sales_opportunity::SalesOpportunity,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub customers: i64,
    pub projects: i64,
    pub sales: i64,
}

pub async fn admin_dashboard(State(state): State<AppState>) -> ApiResult<Json<AdminDashboard>> {
    let (customers, projects, sales) = futures::try_join!(
        Customer::count(&state.db),
        Project::count(&state.db),
        SalesOpportunity::count(&state.db),
    )?;

    Ok(Json(AdminDashboard {
        customers,
        projects,
        sales,
    }))
}
