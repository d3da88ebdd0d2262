/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token issuing and verification with a fixed TTL
/// - [`credentials`]: Credential store accessor, registration and login
/// - [`guard`]: Role allow-list guard middleware for Axum
///
/// # Flow
///
/// ```text
/// POST /users/login ──► credentials::authenticate ──► jwt::TokenAuthority::issue
///
/// protected route  ──► guard::require_role ──► jwt::TokenAuthority::verify ──► handler
/// ```
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use crm_shared::auth::jwt::TokenAuthority;
/// use crm_shared::auth::password::{hash_password, verify_password};
/// use crm_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let tokens = TokenAuthority::new("a-secret-of-at-least-thirty-two-bytes", Duration::hours(1));
/// let token = tokens.issue(Uuid::new_v4(), Role::Admin)?;
/// assert_eq!(tokens.verify(&token)?.role, Role::Admin);
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod guard;
pub mod jwt;
pub mod password;
