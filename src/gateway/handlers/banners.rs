//! Promotional banner handlers. Banners are free-form documents; reads are
//! public and mutations admin-gated.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::auth::AdminUser;
use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::store::Banner;

/// List banners
///
/// GET /banners
#[utoipa::path(
    get,
    path = "/banners",
    responses((status = 200, description = "All banners", body = ApiResponse<Vec<Banner>>)),
    tag = "Banners"
)]
pub async fn list_banners(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Banner>>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.store.list_banners().await?,
    )))
}

/// Create a banner
///
/// POST /banners — admin only.
#[utoipa::path(
    post,
    path = "/banners",
    responses(
        (status = 200, description = "Created banner", body = ApiResponse<Banner>),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "Banners"
)]
pub async fn create_banner(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<Banner>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.store.insert_banner(payload).await?,
    )))
}

/// Delete a banner
///
/// DELETE /banners/{id} — admin only.
#[utoipa::path(
    delete,
    path = "/banners/{id}",
    params(("id" = String, Path, description = "Banner id")),
    responses(
        (status = 200, description = "Banner deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown banner")
    ),
    tag = "Banners"
)]
pub async fn delete_banner(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.delete_banner(&id).await? {
        return Err(ApiError::NotFound("banner"));
    }
    Ok(Json(ApiResponse::success(())))
}
