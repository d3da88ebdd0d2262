/// Credential store accessor
///
/// [`CredentialStore`] is the persistence seam for user records. The API
/// server gets a [`PgCredentialStore`] backed by the connection pool; tests
/// and local tooling can use [`MemoryCredentialStore`].
///
/// [`register`] and [`authenticate`] sit on top of the store and own the
/// password handling: plaintext goes in, only Argon2id hashes reach the store.
///
/// # Example
///
/// ```
/// use crm_shared::auth::credentials::{authenticate, register, MemoryCredentialStore, Registration};
/// use crm_shared::models::user::Role;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryCredentialStore::new();
///
/// register(&store, Registration {
///     name: "Alice".to_string(),
///     email: "alice@example.com".to_string(),
///     role: Role::Admin,
///     password: "pw123".to_string(),
/// }).await?;
///
/// let user = authenticate(&store, "alice@example.com", "pw123").await?;
/// assert_eq!(user.role, Role::Admin);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::password::{self, PasswordError};
use crate::models::user::{CreateUser, Role, User};

/// Error type for credential store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another user already has this email
    #[error("Email already exists")]
    EmailTaken,

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error type for registration and login
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Unknown email or wrong password; the two are not distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailTaken,

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => CredentialError::EmailTaken,
            other => CredentialError::Store(other),
        }
    }
}

/// Read/write access to user records
///
/// Lookups return `Ok(None)` for a missing user and reserve `Err` for
/// system failures.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Inserts a user; `StoreError::EmailTaken` on a duplicate email
    async fn insert(&self, data: CreateUser) -> Result<User, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Returns `true` if a user was removed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// PostgreSQL-backed credential store
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::EmailTaken,
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, data: CreateUser) -> Result<User, StoreError> {
        User::create(&self.pool, data).await.map_err(map_insert_error)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(User::list(&self.pool).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(User::count(&self.pool).await?)
    }
}

/// In-memory credential store
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<Vec<User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            role: data.role,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.users.read().await.len() as i64)
    }
}

/// Registration input carrying the plaintext password
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// Creates a user after checking the email is free
///
/// The uniqueness check runs before the insert; the store's own duplicate
/// detection still covers concurrent registrations.
pub async fn register(
    store: &dyn CredentialStore,
    registration: Registration,
) -> Result<User, CredentialError> {
    if store.find_by_email(&registration.email).await?.is_some() {
        debug!(email = %registration.email, "Registration rejected, email in use");
        return Err(CredentialError::EmailTaken);
    }

    let password_hash = password::hash_password(&registration.password)?;

    let user = store
        .insert(CreateUser {
            name: registration.name,
            email: registration.email,
            role: registration.role,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(user)
}

/// Resolves an (email, password) pair to a user
///
/// An unknown email and a wrong password both yield
/// `CredentialError::InvalidCredentials`.
pub async fn authenticate(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
) -> Result<User, CredentialError> {
    let Some(user) = store.find_by_email(email).await? else {
        warn!(email = %email, "Login failed: unknown email");
        return Err(CredentialError::InvalidCredentials);
    };

    if !password::verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(CredentialError::InvalidCredentials);
    }

    debug!(user_id = %user.id, role = %user.role, "Credentials verified");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Registration {
        Registration {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Admin,
            password: "pw123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = MemoryCredentialStore::new();
        let user = register(&store, alice()).await.unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, Role::Admin);
        assert!(user.password_hash.starts_with("$argon2id$"));
        assert_ne!(user.password_hash, "pw123");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = MemoryCredentialStore::new();
        register(&store, alice()).await.unwrap();

        let result = register(&store, alice()).await;
        assert!(matches!(result, Err(CredentialError::EmailTaken)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let store = MemoryCredentialStore::new();
        let registered = register(&store, alice()).await.unwrap();

        let user = authenticate(&store, "alice@example.com", "pw123").await.unwrap();
        assert_eq!(user.id, registered.id);
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_and_unknown_email_look_alike() {
        let store = MemoryCredentialStore::new();
        register(&store, alice()).await.unwrap();

        let wrong_password = authenticate(&store, "alice@example.com", "nope").await;
        let unknown_email = authenticate(&store, "bob@example.com", "pw123").await;

        assert!(matches!(wrong_password, Err(CredentialError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(CredentialError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_corrupt_hash_is_not_a_credential_miss() {
        let store = MemoryCredentialStore::new();
        store
            .insert(CreateUser {
                name: "Broken".to_string(),
                email: "broken@example.com".to_string(),
                role: Role::Sales,
                password_hash: "$argon2id$invalid".to_string(),
            })
            .await
            .unwrap();

        let result = authenticate(&store, "broken@example.com", "pw123").await;
        assert!(matches!(result, Err(CredentialError::Password(_))));
    }

    #[tokio::test]
    async fn test_find_by_email_absent_is_none() {
        let store = MemoryCredentialStore::new();
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemoryCredentialStore::new();
        let user = register(&store, alice()).await.unwrap();

        assert!(store.delete(user.id).await.unwrap());
        assert!(!store.delete(user.id).await.unwrap());
        assert!(store.find_by_id(user.id).await.unwrap().is_none());
    }

    #[test]
    fn test_store_error_conversion() {
        assert!(matches!(
            CredentialError::from(StoreError::EmailTaken),
            CredentialError::EmailTaken
        ));
        assert!(matches!(
            CredentialError::from(StoreError::Database(sqlx::Error::RowNotFound)),
            CredentialError::Store(_)
        ));
    }
}
