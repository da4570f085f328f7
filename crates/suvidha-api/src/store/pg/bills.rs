//! Bill persistence operations on the `bills` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use suvidha_core::{BillStatus, ServiceType};
use uuid::Uuid;

use crate::state::BillRecord;
use crate::store::StoreError;

const COLUMNS: &str = "id, user_id, service_type, bill_number, amount_due, due_date, \
                       units_consumed, status, created_at, paid_at";

pub async fn insert(pool: &PgPool, bill: &BillRecord) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO bills (id, user_id, service_type, bill_number, amount_due, due_date,
                            units_consumed, status, created_at, paid_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(bill.id)
    .bind(bill.user_id)
    .bind(bill.service_type.as_str())
    .bind(&bill.bill_number)
    .bind(bill.amount_due)
    .bind(bill.due_date)
    .bind(bill.units_consumed)
    .bind(bill.status.as_str())
    .bind(bill.created_at)
    .bind(bill.paid_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// The user's bills, oldest first; only PENDING ones when `pending_only`.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    pending_only: bool,
) -> Result<Vec<BillRecord>, StoreError> {
    let rows = if pending_only {
        sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {COLUMNS} FROM bills WHERE user_id = $1 AND status = $2 ORDER BY created_at"
        ))
        .bind(user_id)
        .bind(BillStatus::Pending.as_str())
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {COLUMNS} FROM bills WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?
    };

    Ok(rows.into_iter().map(BillRow::into_record).collect())
}

pub async fn mark_paid(
    pool: &PgPool,
    user_id: Uuid,
    bill_ids: &[Uuid],
    at: DateTime<Utc>,
) -> Result<usize, StoreError> {
    let result = sqlx::query(
        "UPDATE bills SET status = $1, paid_at = $2 WHERE user_id = $3 AND id = ANY($4)",
    )
    .bind(BillStatus::Paid.as_str())
    .bind(at)
    .bind(user_id)
    .bind(bill_ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() as usize)
}

#[derive(sqlx::FromRow)]
struct BillRow {
    id: Uuid,
    user_id: Uuid,
    service_type: String,
    bill_number: Option<String>,
    amount_due: f64,
    due_date: DateTime<Utc>,
    units_consumed: Option<f64>,
    status: String,
    created_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
}

impl BillRow {
    fn into_record(self) -> BillRecord {
        let service_type = ServiceType::from_code(&self.service_type).unwrap_or_else(|| {
            tracing::error!(
                id = %self.id,
                service_type = %self.service_type,
                "unknown service type in database, defaulting to electricity"
            );
            ServiceType::Electricity
        });
        let status = BillStatus::from_code(&self.status).unwrap_or_else(|| {
            tracing::error!(
                id = %self.id,
                status = %self.status,
                "unknown bill status in database, defaulting to PENDING"
            );
            BillStatus::Pending
        });

        BillRecord {
            id: self.id,
            user_id: self.user_id,
            service_type,
            bill_number: self.bill_number,
            amount_due: self.amount_due,
            due_date: self.due_date,
            units_consumed: self.units_consumed,
            status,
            created_at: self.created_at,
            paid_at: self.paid_at,
        }
    }
}
