//! Minimal Stripe REST client.
//!
//! Covers the three interactions the API needs: creating Checkout sessions,
//! retrieving subscriptions, and verifying webhook signatures. Requests are
//! form-encoded against the v1 API with the secret key as basic-auth user.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

const API_BASE: &str = "https://api.stripe.com";

/// Accepted clock drift between the signature timestamp and our wall clock.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Inputs for a Checkout session. Prices are passed inline (`price_data`)
/// so no price objects have to be provisioned in the Stripe dashboard.
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    /// "payment" for one-off offer purchases, "subscription" for plans.
    pub mode: &'static str,
    pub product_name: String,
    pub currency: String,
    pub unit_amount: i64,
    /// "month" or "year"; required when mode is "subscription".
    pub recurring_interval: Option<&'static str>,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub metadata: Vec<(String, String)>,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Client with no credentials; every API call answers with an error.
    pub fn unconfigured() -> Self {
        Self::new("", "")
    }

    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(AppError::config("STRIPE_SECRET_KEY is not set".to_string()))
        }
    }

    pub async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<CheckoutSession, AppError> {
        self.ensure_configured()?;

        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), params.mode.into()),
            ("success_url".into(), params.success_url),
            ("cancel_url".into(), params.cancel_url),
            ("line_items[0][quantity]".into(), "1".into()),
            (
                "line_items[0][price_data][currency]".into(),
                params.currency.to_lowercase(),
            ),
            (
                "line_items[0][price_data][unit_amount]".into(),
                params.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".into(),
                params.product_name,
            ),
        ];

        if let Some(interval) = params.recurring_interval {
            form.push((
                "line_items[0][price_data][recurring][interval]".into(),
                interval.into(),
            ));
        }

        if let Some(email) = params.customer_email {
            form.push(("customer_email".into(), email));
        }

        for (key, value) in &params.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
            // Propagate onto the subscription object so webhook events carry
            // the same context.
            if params.mode == "subscription" {
                form.push((format!("subscription_data[metadata][{key}]"), value.clone()));
            }
        }

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("stripe request failed: {e}")))?;

        Self::parse_response(response).await
    }

    pub async fn retrieve_subscription(&self, id: &str) -> Result<Subscription, AppError> {
        self.ensure_configured()?;

        let response = self
            .http
            .get(format!("{}/v1/subscriptions/{id}", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("stripe request failed: {e}")))?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(|m| m.as_str().map(String::from))
                })
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(AppError::upstream(format!("stripe returned {status}: {message}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::upstream(format!("stripe response decode failed: {e}")))
    }

    /// Verify a `Stripe-Signature` header against the raw request body.
    ///
    /// The header carries a timestamp and one or more `v1` HMAC-SHA256
    /// signatures over `"{t}.{payload}"`. Comparison goes through the MAC's
    /// own verification, and `t` must be within the tolerance window.
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
        now_unix: i64,
    ) -> Result<(), AppError> {
        if self.webhook_secret.is_empty() {
            return Err(AppError::config("STRIPE_WEBHOOK_SECRET is not set".to_string()));
        }

        let mut timestamp: Option<i64> = None;
        let mut candidates: Vec<&str> = Vec::new();

        for part in signature_header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
                Some(("v1", value)) => candidates.push(value),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            AppError::bad_request(
                "WEBHOOK_SIGNATURE_INVALID",
                "Malformed Stripe-Signature header".to_string(),
            )
        })?;

        if (now_unix - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
            return Err(AppError::bad_request(
                "WEBHOOK_SIGNATURE_INVALID",
                "Signature timestamp outside tolerance".to_string(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
            .map_err(|_| AppError::config("invalid webhook secret".to_string()))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        for candidate in candidates {
            let Ok(decoded) = hex::decode(candidate) else {
                continue;
            };
            if mac.clone().verify_slice(&decoded).is_ok() {
                return Ok(());
            }
        }

        Err(AppError::bad_request(
            "WEBHOOK_SIGNATURE_INVALID",
            "No matching signature".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use super::StripeClient;

    const WEBHOOK_SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], timestamp: i64, secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    fn client() -> StripeClient {
        StripeClient::new("sk_test_key", WEBHOOK_SECRET)
    }

    #[test]
    fn accepts_a_valid_signature() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let now = 1_750_000_000;
        let header = format!("t={now},v1={}", sign(payload, now, WEBHOOK_SECRET));

        assert!(client()
            .verify_webhook_signature(payload, &header, now)
            .is_ok());
    }

    #[test]
    fn accepts_any_matching_v1_entry() {
        let payload = b"payload";
        let now = 1_750_000_000;
        let good = sign(payload, now, WEBHOOK_SECRET);
        let header = format!("t={now},v1=deadbeef,v1={good}");

        assert!(client()
            .verify_webhook_signature(payload, &header, now)
            .is_ok());
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let payload = b"payload";
        let now = 1_750_000_000;
        let header = format!("t={now},v1={}", sign(payload, now, WEBHOOK_SECRET));

        assert!(client()
            .verify_webhook_signature(b"other payload", &header, now)
            .is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let payload = b"payload";
        let now = 1_750_000_000;
        let header = format!("t={now},v1={}", sign(payload, now, "whsec_other"));

        assert!(client()
            .verify_webhook_signature(payload, &header, now)
            .is_err());
    }

    #[test]
    fn rejects_a_stale_timestamp() {
        let payload = b"payload";
        let signed_at = 1_750_000_000;
        let header = format!("t={signed_at},v1={}", sign(payload, signed_at, WEBHOOK_SECRET));

        // 10 minutes later
        assert!(client()
            .verify_webhook_signature(payload, &header, signed_at + 600)
            .is_err());
    }

    #[test]
    fn rejects_malformed_headers() {
        let payload = b"payload";
        let now = 1_750_000_000;

        for header in ["", "v1=abc", "t=notanumber,v1=abc", "garbage"] {
            assert!(
                client()
                    .verify_webhook_signature(payload, header, now)
                    .is_err(),
                "header {header:?} should be rejected"
            );
        }
    }
}
