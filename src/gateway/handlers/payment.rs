//! Payment intent handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::payments::IntentParams;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIntentRequest {
    /// Price in major currency units.
    #[schema(example = 50.0)]
    pub price: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateIntentResponse {
    /// Client-side secret used to complete the payment.
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Obtain a payment confirmation secret for a price
///
/// POST /create-payment-intent
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    request_body = CreateIntentRequest,
    responses(
        (status = 200, description = "Intent created", body = ApiResponse<CreateIntentResponse>),
        (status = 400, description = "Price is not a positive amount"),
        (status = 502, description = "Payment processor failure")
    ),
    tag = "Payments"
)]
pub async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<Json<ApiResponse<CreateIntentResponse>>, ApiError> {
    if !request.price.is_finite() || request.price <= 0.0 {
        return Err(ApiError::BadRequest("price must be a positive amount"));
    }

    let intent = state
        .payments
        .create_intent(IntentParams::card_usd(request.price))
        .await?;

    let client_secret = intent.client_secret.ok_or_else(|| {
        tracing::error!(intent = %intent.id, "payment intent carries no client secret");
        ApiError::Internal
    })?;

    Ok(Json(ApiResponse::success(CreateIntentResponse {
        client_secret,
    })))
}
