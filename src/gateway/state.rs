use std::sync::Arc;

use crate::auth::TokenService;
use crate::booking::BookingOrchestrator;
use crate::payments::PaymentGateway;
use crate::store::BookingStore;

/// Shared gateway state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub tokens: TokenService,
    pub payments: Arc<dyn PaymentGateway>,
    pub bookings: BookingOrchestrator,
}

impl AppState {
    pub fn new(
        store: Arc<dyn BookingStore>,
        tokens: TokenService,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        let bookings = BookingOrchestrator::new(store.clone(), payments.clone());
        Self {
            store,
            tokens,
            payments,
            bookings,
        }
    }
}
