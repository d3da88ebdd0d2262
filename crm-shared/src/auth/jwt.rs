/// JWT issuing and verification
///
/// A [`TokenAuthority`] owns the process-wide HS256 signing key and the token
/// time-to-live. It is built once at startup and shared read-only behind an
/// `Arc`; there is no key rotation and no revocation list.
///
/// # Claims
///
/// - `sub`: user ID
/// - `role`: the user's [`Role`] at login time
/// - `iss`: always `"crm"`
/// - `iat` / `exp`: Unix timestamps, `exp = iat + ttl`
///
/// # Expiry
///
/// A token is expired once the checking time is strictly past `exp`. No
/// leeway is applied, so verification is a pure function of the token, the
/// key and the supplied time. Use [`TokenAuthority::verify_at`] to check
/// against an explicit instant.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use crm_shared::auth::jwt::TokenAuthority;
/// use crm_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let authority = TokenAuthority::new("a-secret-of-at-least-thirty-two-bytes", Duration::hours(1));
/// let user_id = Uuid::new_v4();
///
/// let token = authority.issue(user_id, Role::Sales)?;
/// let claims = authority.verify(&token)?;
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.role, Role::Sales);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::user::Role;

/// Issuer claim written into and required on every token
pub const ISSUER: &str = "crm";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature and structure are valid but the token is past `exp`
    #[error("Token has expired")]
    Expired,

    /// Bad signature, undecodable structure, or wrong issuer
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Role granted at login
    pub role: Role,

    /// Issuer - always "crm"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Builds claims issued at `issued_at` and valid for `ttl`
    ///
    /// Fails with `JwtError::CreateError` when the expiry is not a
    /// representable instant.
    pub fn new(
        user_id: Uuid,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::CreateError("Token expiry out of range".to_string()))?;

        Ok(Self {
            sub: user_id,
            role,
            iss: ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// True once `now` is strictly past the expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// Signs and verifies access tokens with a fixed key and TTL
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Creates an authority from the signing secret and token TTL
    ///
    /// The caller is responsible for rejecting empty or short secrets at
    /// configuration time.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token valid from now for the configured TTL
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, JwtError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issues a token as if signed at `issued_at`
    pub fn issue_at(
        &self,
        user_id: Uuid,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, role, issued_at, self.ttl)?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Verifies a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature, issuer and structure, then expiry at `now`
    ///
    /// # Errors
    ///
    /// - `JwtError::Malformed` if the signature, issuer or structure is bad
    /// - `JwtError::Expired` if `now` is past the embedded `exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| JwtError::Malformed(e.to_string()))?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}
