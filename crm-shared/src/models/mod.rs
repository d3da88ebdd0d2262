/// Database models for the CRM
///
/// Each model is a `sqlx::FromRow` struct with its CRUD operations as
/// associated async functions taking a `&PgPool`.
///
/// # Models
///
/// - `user`: User accounts and roles
/// - `customer`: Customers and the funding status mirrored onto them
/// - `funding`: Funding information per customer
/// - `interaction`: Calls, emails, meetings and file references per customer
/// - `sales_opportunity`: Deals in the sales pipeline
/// - `communication`: Communication log entries
/// - `project`: Projects delivered for a customer
/// - `task`: Project tasks
/// - `support_request`: Support requests raised against a project
/// - `update_log`: Append-only project change log
///
/// # Example
///
/// ```no_run
/// use crm_shared::models::customer::{Customer, CreateCustomer};
/// use crm_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let customer = Customer::create(&pool, CreateCustomer {
///     name: "Acme".to_string(),
///     email: "ops@acme.example".to_string(),
///     industry: Some("Manufacturing".to_string()),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod communication;
pub mod customer;
pub mod funding;
pub mod interaction;
pub mod project;
pub mod sales_opportunity;
pub mod support_request;
pub mod task;
pub mod update_log;
pub mod user;
