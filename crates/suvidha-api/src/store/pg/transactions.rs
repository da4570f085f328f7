//! Payment order persistence on the `transactions` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use suvidha_core::{OrderId, PaymentMethod, PaymentStatus, TransactionId};
use uuid::Uuid;

use super::map_unique;
use crate::state::TransactionRecord;
use crate::store::StoreError;

const COLUMNS: &str = "transaction_id, order_id, user_id, amount, bill_ids, payment_method, \
                       status, payment_id, created_at, verified_at";

pub async fn insert(pool: &PgPool, txn: &TransactionRecord) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO transactions (transaction_id, order_id, user_id, amount, bill_ids,
                                   payment_method, status, payment_id, created_at, verified_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(txn.transaction_id.as_str())
    .bind(txn.order_id.as_str())
    .bind(txn.user_id)
    .bind(txn.amount)
    .bind(&txn.bill_ids)
    .bind(txn.payment_method.as_str())
    .bind(txn.status.as_str())
    .bind(&txn.payment_id)
    .bind(txn.created_at)
    .bind(txn.verified_at)
    .execute(pool)
    .await
    .map_err(|e| map_unique(e, || format!("order {}", txn.order_id)))?;

    Ok(())
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<TransactionRecord>, StoreError> {
    let rows = sqlx::query_as::<_, TransactionRow>(&format!(
        "SELECT {COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY created_at"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(TransactionRow::into_record).collect()
}

/// Mark the caller's order SUCCESS and return the updated row.
pub async fn complete(
    pool: &PgPool,
    order_id: &OrderId,
    user_id: Uuid,
    payment_id: &str,
    at: DateTime<Utc>,
) -> Result<Option<TransactionRecord>, StoreError> {
    let row = sqlx::query_as::<_, TransactionRow>(&format!(
        "UPDATE transactions SET status = $1, payment_id = $2, verified_at = $3
         WHERE order_id = $4 AND user_id = $5
         RETURNING {COLUMNS}"
    ))
    .bind(PaymentStatus::Success.as_str())
    .bind(payment_id)
    .bind(at)
    .bind(order_id.as_str())
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(TransactionRow::into_record).transpose()
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    transaction_id: String,
    order_id: String,
    user_id: Uuid,
    amount: f64,
    bill_ids: Vec<Uuid>,
    payment_method: String,
    status: String,
    payment_id: Option<String>,
    created_at: DateTime<Utc>,
    verified_at: Option<DateTime<Utc>>,
}

impl TransactionRow {
    fn into_record(self) -> Result<TransactionRecord, StoreError> {
        let transaction_id = TransactionId::parse(&self.transaction_id)
            .map_err(|e| StoreError::Corrupt(format!("transaction {}: {e}", self.transaction_id)))?;
        let order_id = OrderId::parse(&self.order_id)
            .map_err(|e| StoreError::Corrupt(format!("transaction {}: {e}", self.transaction_id)))?;

        let payment_method = PaymentMethod::from_code(&self.payment_method).unwrap_or_else(|| {
            tracing::error!(
                transaction_id = %self.transaction_id,
                payment_method = %self.payment_method,
                "unknown payment method in database, defaulting to UPI"
            );
            PaymentMethod::default()
        });
        let status = PaymentStatus::from_code(&self.status).unwrap_or_else(|| {
            tracing::error!(
                transaction_id = %self.transaction_id,
                status = %self.status,
                "unknown payment status in database, defaulting to PENDING"
            );
            PaymentStatus::Pending
        });

        Ok(TransactionRecord {
            transaction_id,
            order_id,
            user_id: self.user_id,
            amount: self.amount,
            bill_ids: self.bill_ids,
            payment_method,
            status,
            payment_id: self.payment_id,
            created_at: self.created_at,
            verified_at: self.verified_at,
        })
    }
}
