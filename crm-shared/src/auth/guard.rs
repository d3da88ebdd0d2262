/// Access guard for Axum
///
/// An [`AccessGuard`] pairs the shared [`TokenAuthority`] with a fixed
/// allow-list of roles. Each request ends in one of three states:
///
/// 1. **Missing credential**: no `Authorization` header → 401 `Unauthorized`
/// 2. **Rejected**: not a valid bearer token (401 `Invalid token` /
///    `Token expired`), or the token's role is outside the allow-list
///    (403 `Access Denied`)
/// 3. **Admitted**: an [`AuthContext`] is attached to the request and the
///    wrapped handler runs
///
/// Rejected requests never reach the handler. The decision reads only the
/// headers, the allow-list, the clock and the signing key.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Router};
/// use chrono::Duration;
/// use crm_shared::auth::guard::{require_role, AccessGuard, AuthContext};
/// use crm_shared::auth::jwt::TokenAuthority;
/// use crm_shared::models::user::Role;
///
/// async fn dashboard(auth: AuthContext) -> String {
///     format!("Hello, {}", auth.role)
/// }
///
/// let tokens = Arc::new(TokenAuthority::new("a-secret-of-at-least-thirty-two-bytes", Duration::hours(1)));
/// let app: Router = Router::new()
///     .route("/admin/dashboard", get(dashboard))
///     .route_layer(middleware::from_fn_with_state(
///         AccessGuard::new(tokens, &[Role::Admin]),
///         require_role,
///     ));
/// ```

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::jwt::{Claims, JwtError, TokenAuthority};
use crate::models::user::Role;

/// Identity of an admitted request
///
/// Inserted into request extensions by [`require_role`]; handlers take it as
/// an extractor argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }

    /// Narrows an admitted request to a stricter allow-list
    ///
    /// For handlers whose route group admits more roles than the operation
    /// itself should.
    pub fn require(&self, allowed: &[Role]) -> Result<(), GuardError> {
        if self.role.is_allowed(allowed) {
            Ok(())
        } else {
            debug!(user_id = %self.user_id, role = %self.role, "Role not in allow-list");
            Err(GuardError::Forbidden)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(GuardError::MissingCredentials)
    }
}

/// Terminal rejection states of the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    /// No Authorization header
    #[error("Unauthorized")]
    MissingCredentials,

    /// Not a bearer token, bad signature, or undecodable
    #[error("Invalid token")]
    Malformed,

    /// Valid signature, past expiry
    #[error("Token expired")]
    Expired,

    /// Valid token, role not allowed
    #[error("Access Denied")]
    Forbidden,
}

impl GuardError {
    pub fn status(&self) -> StatusCode {
        match self {
            GuardError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GuardError::Forbidden => "forbidden",
            _ => "unauthorized",
        }
    }
}

impl From<JwtError> for GuardError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => GuardError::Expired,
            _ => GuardError::Malformed,
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (self.status(), body).into_response()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, GuardError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GuardError::MissingCredentials)?;

    let token = value
        .to_str()
        .map_err(|_| GuardError::Malformed)?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(GuardError::Malformed)?;

    if token.is_empty() {
        return Err(GuardError::Malformed);
    }

    Ok(token)
}

/// Token verifier bound to one allow-list
#[derive(Debug, Clone)]
pub struct AccessGuard {
    tokens: Arc<TokenAuthority>,
    allowed: &'static [Role],
}

impl AccessGuard {
    pub fn new(tokens: Arc<TokenAuthority>, allowed: &'static [Role]) -> Self {
        Self { tokens, allowed }
    }

    /// Decides a request against the current time
    pub fn admit(&self, headers: &HeaderMap) -> Result<AuthContext, GuardError> {
        self.admit_at(headers, Utc::now())
    }

    /// Decides a request as of `now`
    pub fn admit_at(
        &self,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<AuthContext, GuardError> {
        let token = bearer_token(headers)?;
        let claims = self.tokens.verify_at(token, now)?;

        let auth = AuthContext::from_claims(&claims);
        auth.require(self.allowed)?;

        Ok(auth)
    }
}

/// Guard middleware
///
/// Use with `axum::middleware::from_fn_with_state(guard, require_role)`.
pub async fn require_role(
    State(guard): State<AccessGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, GuardError> {
    let auth = match guard.admit(req.headers()) {
        Ok(auth) => auth,
        Err(err) => {
            debug!(
                method = %req.method(),
                path = %req.uri().path(),
                reason = %err,
                "Request rejected by access guard"
            );
            return Err(err);
        }
    };

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
