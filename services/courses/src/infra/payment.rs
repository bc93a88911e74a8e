use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::repository::PaymentGatewayPort;
use crate::domain::types::CheckoutSession;
use crate::error::CoursesServiceError;

/// HTTP client for the hosted payment provider. Every failure, transport or
/// non-2xx, maps to `PaymentFailed` so the caller sees one retryable kind.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    pub client: Client,
    pub base_url: String,
    pub api_key: String,
}

#[derive(Serialize)]
struct CreateCheckoutBody<'a> {
    reference: &'a str,
    amount: i64,
    currency: &'a str,
}

#[derive(Deserialize)]
struct CheckoutResponse {
    id: String,
    url: String,
}

impl PaymentGatewayPort for HttpPaymentGateway {
    async fn create_checkout(
        &self,
        enrollment_id: Uuid,
        amount: i64,
    ) -> Result<CheckoutSession, CoursesServiceError> {
        let reference = enrollment_id.to_string();
        let resp = self
            .client
            .post(format!("{}/checkout-sessions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CreateCheckoutBody {
                reference: &reference,
                amount,
                currency: "USD",
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "payment provider unreachable");
                CoursesServiceError::PaymentFailed
            })?;

        if !resp.status().is_success() {
            tracing::error!(status = %resp.status(), "payment provider rejected checkout");
            return Err(CoursesServiceError::PaymentFailed);
        }

        let body: CheckoutResponse = resp.json().await.map_err(|e| {
            tracing::error!(error = %e, "payment provider returned malformed body");
            CoursesServiceError::PaymentFailed
        })?;
        Ok(CheckoutSession {
            provider_ref: body.id,
            checkout_url: body.url,
        })
    }
}
