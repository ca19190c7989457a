//! Booking handlers: submission, per-user listing, cancellation, and the
//! admin reservations overview.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::auth::{AdminUser, Claims};
use crate::booking::BookingRequest;
use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::store::BookedTest;

/// Commit a booking
///
/// POST /booked-tests — the caller is expected to have completed payment
/// client-side; see `BookingOrchestrator` for the ordering guarantees.
#[utoipa::path(
    post,
    path = "/booked-tests",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking committed", body = ApiResponse<BookedTest>),
        (status = 404, description = "Unknown test title"),
        (status = 409, description = "No slots remaining")
    ),
    tag = "Bookings"
)]
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<ApiResponse<BookedTest>>, ApiError> {
    let booked = state.bookings.submit(request).await?;
    Ok(Json(ApiResponse::success(booked)))
}

/// List the caller's bookings
///
/// GET /bookedTests/{email} — self-scoped.
#[utoipa::path(
    get,
    path = "/bookedTests/{email}",
    params(("email" = String, Path, description = "Owner email")),
    responses(
        (status = 200, description = "The caller's bookings", body = ApiResponse<Vec<BookedTest>>),
        (status = 403, description = "Not the caller's own email")
    ),
    tag = "Bookings"
)]
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Vec<BookedTest>>>, ApiError> {
    claims.ensure_self(&email)?;
    Ok(Json(ApiResponse::success(
        state.store.bookings_for(&email).await?,
    )))
}

/// Cancel a booking
///
/// DELETE /bookedTests/{id} — any authenticated caller.
#[utoipa::path(
    delete,
    path = "/bookedTests/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown booking")
    ),
    tag = "Bookings"
)]
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    _claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.delete_booking(&id).await? {
        return Err(ApiError::NotFound("booking"));
    }
    Ok(Json(ApiResponse::success(())))
}

/// List all bookings
///
/// GET /reservations — admin only.
#[utoipa::path(
    get,
    path = "/reservations",
    responses(
        (status = 200, description = "All bookings", body = ApiResponse<Vec<BookedTest>>),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "Bookings"
)]
pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<BookedTest>>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.store.list_bookings().await?,
    )))
}
