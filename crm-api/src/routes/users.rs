/// User endpoints
///
/// - `POST /users/login`: public; exchanges email and password for a token
/// - `GET /users/profile`: any role; the caller's own record
/// - `GET /users`, `POST /users`: Admin; list and register users
/// - `GET /users/:id`, `DELETE /users/:id`: Admin
///
/// Password hashes never appear in responses.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crm_shared::{
    auth::{
        credentials::{self, Registration},
        guard::AuthContext,
    },
    models::user::{Role, User},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Login request
///
/// Only presence is checked; a malformed email is just an unknown one.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

/// Login
///
/// ```text
/// POST /users/login
/// { "email": "alice@example.com", "password": "pw123" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: `{"error": "Invalid credentials"}` for an unknown
///   email or a wrong password
/// - `422 Unprocessable Entity`: empty email or password
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = credentials::authenticate(state.users.as_ref(), &req.email, &req.password).await?;
    let token = state.tokens.issue(user.id, user.role)?;

    info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        role: user.role,
    }))
}

/// Registers a user (Admin only)
///
/// # Errors
///
/// - `400 Bad Request`: email already registered
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    let user = credentials::register(
        state.users.as_ref(),
        Registration {
            name: req.name,
            email: req.email,
            role: req.role,
            password: req.password,
        },
    )
    .await?;

    info!(user_id = %user.id, created_by = %auth.user_id, "User created by admin");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// The caller's own user record
pub async fn profile(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Json<User>> {
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user))
}

/// Deletes a user (Admin only)
///
/// Admins can't delete their own account, so at least one Admin remains
/// able to manage users.
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if id == auth.user_id {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    if !state.users.delete(id).await? {
        return Err(ApiError::not_found("User"));
    }

    info!(user_id = %id, deleted_by = %auth.user_id, "User deleted");
    Ok(Json(serde_json::json!({ "message": "User deleted successfully" })))
}
