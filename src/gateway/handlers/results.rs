//! Test result handlers. Results are append-only: created by an admin after
//! a test is administered, listed by their owner.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::auth::{AdminUser, Claims};
use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::store::{NewTestResult, TestResult};

/// List a user's test results
///
/// GET /testResults/{email} — self-scoped.
#[utoipa::path(
    get,
    path = "/testResults/{email}",
    params(("email" = String, Path, description = "Owner email")),
    responses(
        (status = 200, description = "The caller's results", body = ApiResponse<Vec<TestResult>>),
        (status = 403, description = "Not the caller's own email")
    ),
    tag = "Results"
)]
pub async fn my_results(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Vec<TestResult>>>, ApiError> {
    claims.ensure_self(&email)?;
    Ok(Json(ApiResponse::success(
        state.store.results_for(&email).await?,
    )))
}

/// Record a test result
///
/// POST /submit-result/{id} — admin only. The path id names the booking the
/// result belongs to; the payload carries the owner and result body.
#[utoipa::path(
    post,
    path = "/submit-result/{id}",
    params(("id" = String, Path, description = "Booking id")),
    request_body = NewTestResult,
    responses(
        (status = 200, description = "Result recorded", body = ApiResponse<TestResult>),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "Results"
)]
pub async fn submit_result(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(_id): Path<String>,
    Json(result): Json<NewTestResult>,
) -> Result<Json<ApiResponse<TestResult>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.store.insert_result(result).await?,
    )))
}
