//! # Payment Routes
//!
//! Order creation against the Razorpay gateway and the webhook that marks
//! orders paid.
//!
//! The webhook handler reads the raw body: the HMAC signature covers the
//! exact bytes Razorpay sent, so the body must be verified before any JSON
//! parsing. Delivery is at-least-once, so the paid transition is
//! idempotent, and after the signature checks out the handler always
//! acknowledges with 200 to stop the gateway from retrying.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use yoursai_shared::models::payment::{CreatePayment, Payment};

/// Header carrying the gateway's webhook signature
const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Order creation request body
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub email: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(default)]
    event: String,

    #[serde(default)]
    payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    payment: Option<WebhookPayment>,
}

#[derive(Debug, Deserialize)]
struct WebhookPayment {
    entity: Option<PaymentEntity>,
}

#[derive(Debug, Deserialize)]
struct PaymentEntity {
    order_id: Option<String>,
}

/// POST /api/payment/create-order - open a gateway order
///
/// The client submits the amount in major units (rupees); the gateway
/// receives minor units (paise). The order is recorded locally with
/// status `created` and the full gateway order plus the public key id go
/// back to the client for the checkout widget.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(email), Some(amount)) = (payload.email, payload.amount) else {
        return Err(ApiError::BadRequest(
            "Email and amount are required".to_string(),
        ));
    };

    // checked_mul: Decimal accepts values large enough for * 100 to
    // overflow, and that must be a 400, not a panic
    let amount_minor = amount
        .checked_mul(Decimal::from(100))
        .map(|minor| minor.trunc())
        .and_then(|minor| minor.to_i64())
        .filter(|minor| *minor > 0)
        .ok_or_else(|| ApiError::BadRequest("Invalid amount".to_string()))?;

    let receipt = format!("rcpt_{}", Utc::now().timestamp_millis());

    let order = state
        .razorpay
        .create_order(amount_minor, "INR", &receipt)
        .await?;

    // No compensation if this insert fails: the remote order exists but
    // is never recorded. Accepted as-is; the webhook for an unknown
    // order id is a no-op.
    Payment::create(
        &state.db,
        CreatePayment {
            order_id: order.id.clone(),
            email,
            amount,
        },
    )
    .await?;

    tracing::info!(order_id = %order.id, amount_minor, "Payment order created");

    Ok(Json(json!({
        "success": true,
        "order": order,
        "key": state.razorpay.key_id(),
    })))
}

/// POST /api/payment/webhook - gateway event delivery
///
/// Returns 400 when the signature header is absent, 401 when the
/// signature does not match, and 200 otherwise. Database failures while
/// applying the paid transition are logged but still acknowledged, since
/// a retry storm will not fix a broken database.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing signature header".to_string()))?;

    if !state.razorpay.verify_webhook_signature(&body, signature) {
        return Err(ApiError::Unauthorized(
            "Invalid webhook signature".to_string(),
        ));
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Invalid payload".to_string()))?;

    if event.event == "payment.captured" {
        let order_id = event
            .payload
            .payment
            .and_then(|p| p.entity)
            .and_then(|e| e.order_id);

        if let Some(order_id) = order_id {
            match Payment::mark_paid(&state.db, &order_id).await {
                Ok(true) => tracing::info!(%order_id, "Payment captured"),
                Ok(false) => {
                    tracing::warn!(%order_id, "Capture for unknown or already-paid order")
                }
                Err(e) => tracing::error!(%order_id, "Failed to record capture: {}", e),
            }
        } else {
            tracing::warn!("payment.captured event without an order id");
        }
    } else {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
    }

    Ok(Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_converts_to_minor_units() {
        let amount = Decimal::new(49900, 2); // 499.00
        let minor = (amount * Decimal::from(100)).trunc().to_i64();
        assert_eq!(minor, Some(49900));
    }

    #[test]
    fn test_fractional_paise_truncated() {
        let amount = Decimal::new(99999, 3); // 99.999
        let minor = amount
            .checked_mul(Decimal::from(100))
            .map(|m| m.trunc())
            .and_then(|m| m.to_i64());
        assert_eq!(minor, Some(9999));
    }

    #[test]
    fn test_oversized_amount_overflows_to_none() {
        // 1e28 deserializes fine (Decimal max is about 7.9e28) but does
        // not survive the conversion to paise
        let req: CreateOrderRequest =
            serde_json::from_str(r#"{"email":"a@x.com","amount":1e28}"#).unwrap();
        let amount = req.amount.unwrap();

        let minor = amount
            .checked_mul(Decimal::from(100))
            .map(|m| m.trunc())
            .and_then(|m| m.to_i64());
        assert_eq!(minor, None);
    }

    #[test]
    fn test_webhook_event_parses_captured() {
        let raw = r#"{
            "event": "payment.captured",
            "payload": {
                "payment": {
                    "entity": { "id": "pay_1", "order_id": "order_9" }
                }
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.event, "payment.captured");

        let order_id = event
            .payload
            .payment
            .and_then(|p| p.entity)
            .and_then(|e| e.order_id);
        assert_eq!(order_id.as_deref(), Some("order_9"));
    }

    #[test]
    fn test_webhook_event_tolerates_missing_payload() {
        let event: WebhookEvent =
            serde_json::from_str(r#"{"event":"order.paid"}"#).unwrap();
        assert_eq!(event.event, "order.paid");
        assert!(event.payload.payment.is_none());
    }

    #[test]
    fn test_create_order_request_with_numeric_amount() {
        let req: CreateOrderRequest =
            serde_json::from_str(r#"{"email":"a@x.com","amount":499}"#).unwrap();
        assert_eq!(req.amount, Some(Decimal::from(499)));
    }
}
