//! Token issuance and user management handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::extract::{require_admin, AdminUser};
use super::service::Claims;
use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::store::{NewUser, Role, User};

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStatus {
    pub admin: bool,
}

/// Issue an identity token for a submitted user object
///
/// POST /jwt
#[utoipa::path(
    post,
    path = "/jwt",
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Subject has no email")
    ),
    tag = "Auth"
)]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(subject): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let email = subject
        .get("email")
        .and_then(|v| v.as_str())
        .ok_or(ApiError::BadRequest("subject email is required"))?;

    let token = state.tokens.issue(email).map_err(|e| {
        tracing::error!("token issuance failed: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(ApiResponse::success(TokenResponse { token })))
}

/// Report whether the given email belongs to an admin
///
/// GET /users/admin/{email} — self-scoped.
#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    params(("email" = String, Path, description = "Email to check")),
    responses(
        (status = 200, description = "Admin flag", body = ApiResponse<AdminStatus>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the caller's own email")
    ),
    tag = "Users"
)]
pub async fn admin_status(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<AdminStatus>>, ApiError> {
    claims.ensure_self(&email)?;

    let admin = state
        .store
        .find_user_by_email(&email)
        .await?
        .map(|u| u.role == Role::Admin)
        .unwrap_or(false);

    Ok(Json(ApiResponse::success(AdminStatus { admin })))
}

/// Promote a user to the admin role
///
/// PATCH /users/admin/{id} — admin only. Shares its route shape with the
/// self-scoped admin check above, so stage 2 of the gate runs inline here.
#[utoipa::path(
    patch,
    path = "/users/admin/{id}",
    params(("id" = String, Path, description = "User id to promote")),
    responses(
        (status = 200, description = "User promoted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown user")
    ),
    tag = "Users"
)]
pub async fn promote_user(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&state, &claims).await?;

    if !state.store.promote_user(&id).await? {
        return Err(ApiError::NotFound("user"));
    }
    tracing::info!(user_id = %id, by = %claims.email, "user promoted to admin");
    Ok(Json(ApiResponse::success(())))
}

/// Fetch a user by email
///
/// GET /loggedUser/{email} — self-scoped.
#[utoipa::path(
    get,
    path = "/loggedUser/{email}",
    params(("email" = String, Path, description = "Email to fetch")),
    responses(
        (status = 200, description = "The user", body = ApiResponse<User>),
        (status = 403, description = "Not the caller's own email"),
        (status = 404, description = "Unknown user")
    ),
    tag = "Users"
)]
pub async fn logged_user(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    claims.ensure_self(&email)?;

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(ApiResponse::success(user)))
}

/// List all users
///
/// GET /users — admin only.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<User>>),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.store.list_users().await?)))
}

/// Create (or return the existing) user for an email
///
/// POST /users — public; called on first sign-in.
#[utoipa::path(
    post,
    path = "/users",
    request_body = NewUser,
    responses(
        (status = 200, description = "The stored user", body = ApiResponse<User>)
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(user): Json<NewUser>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.store.upsert_user(user).await?,
    )))
}
