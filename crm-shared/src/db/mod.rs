/// Database layer
///
/// Connection pooling lives here; models are in the `models` module at the
/// crate root. The schema is plain DDL in `schema/crm.sql` at the repository
/// root and is applied outside the application.
///
/// # Example
///
/// ```no_run
/// use crm_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
