//! # Razorpay Gateway Client
//!
//! Creates payment orders against the Razorpay REST API and verifies the
//! HMAC-SHA256 signature Razorpay attaches to webhook deliveries.
//!
//! Order creation uses HTTP basic auth with the key id and secret. Webhook
//! verification recomputes the signature over the raw request body with the
//! webhook secret and compares it against the `x-razorpay-signature` header
//! in constant time.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;

use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay client errors
#[derive(Debug, Error)]
pub enum RazorpayError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gateway returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Order object returned by the gateway
///
/// The fields the backend needs are typed; everything else Razorpay sends
/// is carried through verbatim so the client receives the full order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,

    /// Amount in minor currency units (paise)
    pub amount: i64,

    pub currency: String,

    #[serde(default)]
    pub receipt: Option<String>,

    pub status: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Razorpay API client
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    webhook_secret: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            webhook_secret: config.webhook_secret.clone(),
        }
    }

    /// Public key id, handed to the client for the checkout widget
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Creates a payment order
    ///
    /// `amount_minor` is in minor currency units (paise for INR).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway responds with
    /// a non-success status.
    pub async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<RazorpayOrder, RazorpayError> {
        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": amount_minor,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let order = response.json::<RazorpayOrder>().await?;
        Ok(order)
    }

    /// Verifies a webhook delivery signature
    ///
    /// Recomputes HMAC-SHA256 over the raw body with the webhook secret
    /// and compares against the hex signature from the header. Comparison
    /// is constant time. A malformed hex signature is simply invalid.
    pub fn verify_webhook_signature(&self, payload: &[u8], signature_hex: &str) -> bool {
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };

        // Key of any length is accepted for HMAC
        let Ok(mut mac) = HmacSha256::new_from_slice(self.webhook_secret.as_bytes()) else {
            return false;
        };
        mac.update(payload);
        mac.verify_slice(&signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> RazorpayClient {
        RazorpayClient::new(&RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: "rzp_test_secret".to_string(),
            webhook_secret: "whsec_test".to_string(),
        })
    }

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let client = test_client();
        let payload = br#"{"event":"payment.captured"}"#;
        let signature = sign("whsec_test", payload);

        assert!(client.verify_webhook_signature(payload, &signature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let client = test_client();
        let payload = br#"{"event":"payment.captured"}"#;
        let signature = sign("some_other_secret", payload);

        assert!(!client.verify_webhook_signature(payload, &signature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let client = test_client();
        let signature = sign("whsec_test", br#"{"amount":100}"#);

        assert!(!client.verify_webhook_signature(br#"{"amount":999}"#, &signature));
    }

    #[test]
    fn test_malformed_hex_rejected() {
        let client = test_client();
        assert!(!client.verify_webhook_signature(b"payload", "not-hex-at-all"));
        assert!(!client.verify_webhook_signature(b"payload", ""));
    }

    #[test]
    fn test_order_deserializes_with_extra_fields() {
        let json = r#"{
            "id": "order_Mq1x",
            "amount": 49900,
            "currency": "INR",
            "receipt": "rcpt_1700000000",
            "status": "created",
            "amount_paid": 0,
            "notes": []
        }"#;

        let order: RazorpayOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, "order_Mq1x");
        assert_eq!(order.amount, 49900);
        assert!(order.extra.contains_key("amount_paid"));
    }
}
