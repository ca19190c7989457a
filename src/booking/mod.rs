//! Booking orchestration.
//!
//! Coordinates the slot reservation and the booking record so that under
//! concurrent submissions a test with `k` remaining slots accepts exactly
//! `k` bookings. The slot is reserved first via a conditional atomic
//! decrement; the booking record is only written after the reservation
//! succeeds, and the slot is released again if that write fails.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::payments::{PaymentError, PaymentGateway};
use crate::store::{BookedTest, BookingStore, NewBooking, SlotReservation, StoreError};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookingRequest {
    pub email: String,
    #[serde(rename = "testName")]
    pub test_name: String,
    pub amount: f64,
    /// When present, the intent is checked against the payment processor
    /// before any slot is reserved.
    #[serde(rename = "paymentIntentId")]
    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("no slots remaining for test '{0}'")]
    SoldOut(String),
    #[error("no test titled '{0}'")]
    UnknownTest(String),
    #[error("payment intent '{intent}' is not confirmed (status: {status})")]
    PaymentUnconfirmed { intent: String, status: String },
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct BookingOrchestrator {
    store: Arc<dyn BookingStore>,
    payments: Arc<dyn PaymentGateway>,
}

impl BookingOrchestrator {
    pub fn new(store: Arc<dyn BookingStore>, payments: Arc<dyn PaymentGateway>) -> Self {
        Self { store, payments }
    }

    /// Commits a booking: verify the payment intent when one is supplied,
    /// reserve a slot, then persist the booking record.
    pub async fn submit(&self, request: BookingRequest) -> Result<BookedTest, BookingError> {
        if let Some(intent_id) = &request.payment_intent_id {
            let intent = self.payments.retrieve_intent(intent_id).await?;
            if !intent.is_succeeded() {
                return Err(BookingError::PaymentUnconfirmed {
                    intent: intent.id,
                    status: intent.status,
                });
            }
        }

        match self.store.reserve_slot(&request.test_name).await? {
            SlotReservation::Reserved => {}
            SlotReservation::SoldOut => {
                tracing::warn!(test = %request.test_name, "booking rejected: sold out");
                return Err(BookingError::SoldOut(request.test_name));
            }
            SlotReservation::UnknownTest => {
                return Err(BookingError::UnknownTest(request.test_name));
            }
        }

        let booking = NewBooking {
            email: request.email,
            test_name: request.test_name.clone(),
            amount: request.amount,
        };
        match self.store.insert_booking(booking).await {
            Ok(booked) => {
                tracing::info!(id = %booked.id, test = %booked.test_name, "booking committed");
                Ok(booked)
            }
            Err(e) => {
                // The slot was reserved but the record could not be written;
                // hand the slot back before surfacing the failure.
                if let Err(release_err) = self.store.release_slot(&request.test_name).await {
                    tracing::error!(
                        test = %request.test_name,
                        "failed to release slot after booking insert error: {}",
                        release_err
                    );
                }
                Err(e.into())
            }
        }
    }
}
