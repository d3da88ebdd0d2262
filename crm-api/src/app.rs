/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use crm_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use crm_shared::{
    auth::{
        credentials::{CredentialStore, PgCredentialStore},
        guard::{require_role, AccessGuard},
        jwt::TokenAuthority,
    },
    models::user::Role,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// User management and reports
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Customers (write), funding, interactions, sales and communications
pub const SALES_TEAM: &[Role] = &[Role::Admin, Role::Sales];

/// Projects, tasks, support requests and update logs
pub const PROJECT_TEAM: &[Role] = &[Role::Admin, Role::ProjectManager];

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// User records and credentials
    pub users: Arc<dyn CredentialStore>,

    /// Token signing and verification
    pub tokens: Arc<TokenAuthority>,

    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state backed by PostgreSQL for both data and credentials
    pub fn new(db: PgPool, config: Config) -> Self {
        let users = Arc::new(PgCredentialStore::new(db.clone()));
        Self::with_store(db, users, config)
    }

    /// Creates state with a custom credential store
    pub fn with_store(db: PgPool, users: Arc<dyn CredentialStore>, config: Config) -> Self {
        let tokens = Arc::new(TokenAuthority::new(&config.jwt.secret, config.jwt.ttl()));

        Self {
            db,
            users,
            tokens,
            config: Arc::new(config),
        }
    }

    fn guard(&self, allowed: &'static [Role]) -> AccessGuard {
        AccessGuard::new(self.tokens.clone(), allowed)
    }
}

/// Builds the complete router
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health, POST /users/login          public
/// ├── /users/profile, /dashboard-stats,
/// │   /customers[/:id]                         any role (writes: Admin, Sales)
/// ├── /users[/:id], /admin/dashboard,
/// │   /reports/*                               Admin
/// ├── /funding, /interactions,
/// │   /sales_opportunity, /communications      Admin, Sales
/// └── /projects, /tasks, /support_requests,
///     /update_logs                             Admin, Project Manager
/// ```
///
/// Each group carries its own guard as a route layer, so unmatched paths
/// fall through to a plain 404. No two groups share a path.
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, response compression, request
/// tracing, then the per-group access guard.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/users/login", post(routes::users::login));

    let any_role_routes = Router::new()
        .route("/users/profile", get(routes::users::profile))
        .route("/dashboard-stats", get(routes::dashboard::dashboard_stats))
        .route(
            "/customers",
            get(routes::customers::list_customers).post(routes::customers::create_customer),
        )
        .route(
            "/customers/:id",
            get(routes::customers::get_customer)
                .put(routes::customers::update_customer)
                .delete(routes::customers::delete_customer),
        )
        .route_layer(from_fn_with_state(state.guard(Role::ALL), require_role));

    let admin_routes = Router::new()
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::register),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user).delete(routes::users::delete_user),
        )
        .route("/admin/dashboard", get(routes::admin::admin_dashboard))
        .route("/reports/sales_summary", get(routes::reports::sales_summary))
        .route(
            "/reports/customer_distribution",
            get(routes::reports::customer_distribution),
        )
        .route("/reports/project_budget", get(routes::reports::project_budget))
        .route_layer(from_fn_with_state(state.guard(ADMIN_ONLY), require_role));

    let sales_routes = Router::new()
        .route(
            "/funding/customers/:customer_id",
            get(routes::funding::get_funding)
                .post(routes::funding::create_funding)
                .put(routes::funding::update_funding)
                .delete(routes::funding::delete_funding),
        )
        .route(
            "/interactions/:customer_id",
            get(routes::interactions::list_interactions)
                .post(routes::interactions::create_interaction),
        )
        .route(
            "/sales_opportunity",
            get(routes::sales::list_opportunities).post(routes::sales::create_opportunity),
        )
        .route(
            "/sales_opportunity/customer/:customer_id",
            get(routes::sales::list_customer_opportunities),
        )
        .route(
            "/sales_opportunity/:id",
            put(routes::sales::update_opportunity).delete(routes::sales::delete_opportunity),
        )
        .route(
            "/communications",
            get(routes::communications::list_communications)
                .post(routes::communications::create_communication),
        )
        .route(
            "/communications/:id",
            axum::routing::delete(routes::communications::delete_communication),
        )
        .route_layer(from_fn_with_state(state.guard(SALES_TEAM), require_role));

    let project_routes = Router::new()
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project).delete(routes::projects::delete_project),
        )
        .route(
            "/projects/customers/:customer_id",
            get(routes::projects::list_customer_projects)
                .post(routes::projects::create_customer_project),
        )
        .route(
            "/tasks/projects/:project_id",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route(
            "/support_requests/projects/:project_id",
            get(routes::support_requests::list_support_requests)
                .post(routes::support_requests::create_support_request),
        )
        .route(
            "/support_requests/:id",
            put(routes::support_requests::update_support_request),
        )
        .route(
            "/update_logs/projects/:project_id",
            get(routes::update_logs::list_update_logs).post(routes::update_logs::create_update_log),
        )
        .route_layer(from_fn_with_state(state.guard(PROJECT_TEAM), require_role));

    let cors = cors_layer(&state.config.api.cors_origins);
    let production = state.config.api.production;

    Router::new()
        .merge(public_routes)
        .merge(any_role_routes)
        .merge(admin_routes)
        .merge(sales_routes)
        .merge(project_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

/// Permissive when the list contains `*`, otherwise restricted to the list
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_lists() {
        assert!(Role::Admin.is_allowed(ADMIN_ONLY));
        assert!(!Role::Sales.is_allowed(ADMIN_ONLY));

        assert!(Role::Sales.is_allowed(SALES_TEAM));
        assert!(!Role::ProjectManager.is_allowed(SALES_TEAM));

        assert!(Role::ProjectManager.is_allowed(PROJECT_TEAM));
        assert!(!Role::Sales.is_allowed(PROJECT_TEAM));

        for team in [ADMIN_ONLY, SALES_TEAM, PROJECT_TEAM] {
            assert!(Role::Admin.is_allowed(team));
        }
    }

    #[test]
    fn test_cors_layer_builds_for_explicit_origins() {
        let _ = cors_layer(&["https://crm.example.com".to_string()]);
        let _ = cors_layer(&["*".to_string()]);
    }
}
