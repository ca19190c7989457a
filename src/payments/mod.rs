//! Payment processor facade.
//!
//! The processor is consumed as an opaque service: we create a card payment
//! intent in a fixed currency and hand the client-side confirmation secret
//! back to the caller. Processor failures propagate as [`PaymentError`].

pub mod stripe;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use stripe::StripeGateway;

/// Fixed settlement currency.
pub const CURRENCY: &str = "usd";
/// Only card payments are offered.
pub const PAYMENT_METHOD: &str = "card";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment processor transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("payment processor rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Parameters for an intent-creation call, already in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentParams {
    pub amount_minor: i64,
    pub currency: &'static str,
    pub payment_method: &'static str,
}

impl IntentParams {
    /// Builds card/usd parameters from a price in major units.
    pub fn card_usd(price: f64) -> Self {
        Self {
            amount_minor: (price * 100.0).round() as i64,
            currency: CURRENCY,
            payment_method: PAYMENT_METHOD,
        }
    }
}

/// An in-progress charge at the external processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Client-side secret used to complete the payment.
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

impl PaymentIntent {
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, params: IntentParams) -> Result<PaymentIntent, PaymentError>;
    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError>;
}
