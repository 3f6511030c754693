/// Payment order ledger model
///
/// One row per payment order created against the gateway. The row is
/// inserted with status `created` when the remote order is opened and
/// flipped to `paid` by the webhook handler when the gateway reports
/// `payment.captured`. The transition is monotonic: `created -> paid`,
/// never reversed, and applying it twice is a no-op.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE payments (
///     id          BIGSERIAL PRIMARY KEY,
///     order_id    TEXT NOT NULL UNIQUE,
///     email       TEXT NOT NULL,
///     amount      NUMERIC NOT NULL,
///     status      TEXT NOT NULL DEFAULT 'created',
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `amount` is in major currency units exactly as submitted by the client;
/// the gateway receives `amount * 100` minor units.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Lifecycle status of a payment order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Remote order opened, not yet captured
    Created,

    /// Gateway reported payment.captured
    Paid,
}

impl PaymentStatus {
    /// Gets status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// Payment order ledger row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    /// Surrogate identifier
    pub id: i64,

    /// Gateway-assigned order identifier, unique
    pub order_id: String,

    /// Email submitted with the order request
    pub email: String,

    /// Amount in major currency units as submitted by the client
    pub amount: Decimal,

    /// Lifecycle status
    pub status: PaymentStatus,

    /// When the ledger row was created
    pub created_at: DateTime<Utc>,
}

/// Input for recording a freshly created gateway order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    /// Gateway-assigned order identifier
    pub order_id: String,

    /// Email submitted with the order request
    pub email: String,

    /// Amount in major currency units
    pub amount: Decimal,
}

impl Payment {
    /// Records a new payment order with status `created`
    ///
    /// # Errors
    ///
    /// Returns an error if the order id already exists (unique constraint
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreatePayment) -> Result<Self, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (order_id, email, amount, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, email, amount, status, created_at
            "#,
        )
        .bind(data.order_id)
        .bind(data.email)
        .bind(data.amount)
        .bind(PaymentStatus::Created)
        .fetch_one(pool)
        .await?;

        Ok(payment)
    }

    /// Finds a payment order by its gateway order identifier
    pub async fn find_by_order_id(
        pool: &PgPool,
        order_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, order_id, email, amount, status, created_at
            FROM payments
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(pool)
        .await?;

        Ok(payment)
    }

    /// Marks a payment order as paid
    ///
    /// Idempotent and monotonic: the status predicate ensures the
    /// transition is applied at most once and a `paid` row is never
    /// touched again, even if the gateway delivers the same webhook event
    /// twice.
    ///
    /// # Returns
    ///
    /// True if a row transitioned `created -> paid`, false if no matching
    /// order existed or it was already paid.
    pub async fn mark_paid(pool: &PgPool, order_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = $1
            WHERE order_id = $2 AND status = $3
            "#,
        )
        .bind(PaymentStatus::Paid)
        .bind(order_id)
        .bind(PaymentStatus::Created)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(PaymentStatus::Created.as_str(), "created");
        assert_eq!(PaymentStatus::Paid.as_str(), "paid");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
    }

    #[test]
    fn test_create_payment_struct() {
        let data = CreatePayment {
            order_id: "order_abc123".to_string(),
            email: "a@x.com".to_string(),
            amount: Decimal::new(49900, 2), // 499.00
        };

        assert_eq!(data.order_id, "order_abc123");
        assert_eq!(data.amount.to_string(), "499.00");
    }

    // Integration tests for database operations are in the API crate's
    // tests/ directory and require a running database.
}
