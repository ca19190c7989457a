//! Error taxonomy for the HTTP surface.
//!
//! Every handler failure mode is one of these variants; raw store or
//! payment-processor faults never reach the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::types::{error_codes, ApiResponse};
use crate::booking::BookingError;
use crate::payments::PaymentError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, invalid, or expired token.
    #[error("unauthorized access")]
    Unauthorized,
    /// Authenticated, but wrong role or wrong identity for a self-scoped
    /// resource.
    #[error("forbidden access")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The test exists but has no remaining slots.
    #[error("no slots remaining for this test")]
    SoldOut,
    #[error("invalid request: {0}")]
    BadRequest(&'static str),
    #[error("payment gateway error")]
    PaymentGateway(#[from] PaymentError),
    #[error("storage error")]
    Storage(#[from] StoreError),
    #[error("internal server error")]
    Internal,
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::SoldOut(_) => ApiError::SoldOut,
            BookingError::UnknownTest(_) => ApiError::NotFound("test"),
            BookingError::PaymentUnconfirmed { .. } => {
                ApiError::BadRequest("payment is not confirmed")
            }
            BookingError::Payment(e) => ApiError::PaymentGateway(e),
            BookingError::Store(e) => ApiError::Storage(e),
        }
    }
}

impl ApiError {
    pub fn code(&self) -> i32 {
        match self {
            ApiError::Unauthorized => error_codes::UNAUTHORIZED,
            ApiError::Forbidden => error_codes::FORBIDDEN,
            ApiError::NotFound(_) => error_codes::NOT_FOUND,
            ApiError::SoldOut => error_codes::SOLD_OUT,
            ApiError::BadRequest(_) => error_codes::INVALID_PARAMETER,
            ApiError::PaymentGateway(_) => error_codes::PAYMENT_GATEWAY,
            ApiError::Storage(_) => error_codes::STORAGE_ERROR,
            ApiError::Internal => error_codes::INTERNAL_ERROR,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SoldOut => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PaymentGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::PaymentGateway(e) => tracing::error!("payment gateway failure: {}", e),
            ApiError::Storage(e) => tracing::error!("storage failure: {}", e),
            _ => {}
        }
        let body = ApiResponse::<()>::error(self.code(), self.to_string());
        (self.http_status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Unauthorized.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::SoldOut.http_status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound("test").http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn code_mapping() {
        assert_eq!(ApiError::Unauthorized.code(), error_codes::UNAUTHORIZED);
        assert_eq!(ApiError::SoldOut.code(), error_codes::SOLD_OUT);
    }
}
