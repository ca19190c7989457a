//! Stripe client for the payment gateway seam.

use async_trait::async_trait;
use serde::Deserialize;

use super::{IntentParams, PaymentError, PaymentGateway, PaymentIntent};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: Option<String>,
    status: String,
    amount: i64,
    currency: String,
}

impl From<StripeIntent> for PaymentIntent {
    fn from(i: StripeIntent) -> Self {
        PaymentIntent {
            id: i.id,
            client_secret: i.client_secret,
            status: i.status,
            amount: i.amount,
            currency: i.currency,
        }
    }
}

impl StripeGateway {
    pub fn new(secret_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            base_url: STRIPE_API_BASE.to_string(),
        }
    }

    /// Override the API base, used to point at a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn into_intent(resp: reqwest::Response) -> Result<PaymentIntent, PaymentError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        let intent: StripeIntent = resp.json().await?;
        Ok(intent.into())
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, params: IntentParams) -> Result<PaymentIntent, PaymentError> {
        let form = [
            ("amount", params.amount_minor.to_string()),
            ("currency", params.currency.to_string()),
            ("payment_method_types[]", params.payment_method.to_string()),
        ];
        let resp = self
            .client
            .post(format!("{}/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;
        Self::into_intent(resp).await
    }

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let resp = self
            .client
            .get(format!("{}/payment_intents/{}", self.base_url, id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::into_intent(resp).await
    }
}
