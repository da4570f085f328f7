//! Grievance persistence operations on the `grievances` table.
//!
//! Every read and write is filtered by `user_id` as well as `ticket_id`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use suvidha_core::{GrievanceCategory, GrievanceStatus, Priority, TicketId};
use uuid::Uuid;

use super::map_unique;
use crate::state::GrievanceRecord;
use crate::store::StoreError;

const COLUMNS: &str = "ticket_id, user_id, category, description, audio_url, attachment_url, \
                       status, priority, estimated_resolution, created_at, resolved_at";

pub async fn insert(pool: &PgPool, grievance: &GrievanceRecord) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO grievances (ticket_id, user_id, category, description, audio_url,
                                 attachment_url, status, priority, estimated_resolution,
                                 created_at, resolved_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(grievance.ticket_id.as_str())
    .bind(grievance.user_id)
    .bind(grievance.category.as_str())
    .bind(&grievance.description)
    .bind(&grievance.audio_url)
    .bind(&grievance.attachment_url)
    .bind(grievance.status.as_str())
    .bind(grievance.priority.as_str())
    .bind(&grievance.estimated_resolution)
    .bind(grievance.created_at)
    .bind(grievance.resolved_at)
    .execute(pool)
    .await
    .map_err(|e| map_unique(e, || format!("ticket id {}", grievance.ticket_id)))?;

    Ok(())
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<GrievanceRecord>, StoreError> {
    let rows = sqlx::query_as::<_, GrievanceRow>(&format!(
        "SELECT {COLUMNS} FROM grievances WHERE user_id = $1 ORDER BY created_at"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(GrievanceRow::into_record).collect()
}

pub async fn get(
    pool: &PgPool,
    ticket_id: &TicketId,
    user_id: Uuid,
) -> Result<Option<GrievanceRecord>, StoreError> {
    let row = sqlx::query_as::<_, GrievanceRow>(&format!(
        "SELECT {COLUMNS} FROM grievances WHERE ticket_id = $1 AND user_id = $2"
    ))
    .bind(ticket_id.as_str())
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(GrievanceRow::into_record).transpose()
}

/// Replace the description when given. Priority and SLA columns are never
/// written here.
pub async fn update_description(
    pool: &PgPool,
    ticket_id: &TicketId,
    user_id: Uuid,
    description: Option<&str>,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        "UPDATE grievances SET description = COALESCE($1, description)
         WHERE ticket_id = $2 AND user_id = $3",
    )
    .bind(description)
    .bind(ticket_id.as_str())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[derive(sqlx::FromRow)]
struct GrievanceRow {
    ticket_id: String,
    user_id: Uuid,
    category: String,
    description: String,
    audio_url: Option<String>,
    attachment_url: Option<String>,
    status: String,
    priority: String,
    estimated_resolution: String,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl GrievanceRow {
    fn into_record(self) -> Result<GrievanceRecord, StoreError> {
        let ticket_id = TicketId::parse(&self.ticket_id)
            .map_err(|e| StoreError::Corrupt(format!("grievance {}: {e}", self.ticket_id)))?;

        let category = GrievanceCategory::from_code(&self.category).unwrap_or_else(|| {
            tracing::error!(
                ticket_id = %self.ticket_id,
                category = %self.category,
                "unknown grievance category in database, defaulting to OTHER"
            );
            GrievanceCategory::Other
        });
        let status = GrievanceStatus::from_code(&self.status).unwrap_or_else(|| {
            tracing::error!(
                ticket_id = %self.ticket_id,
                status = %self.status,
                "unknown grievance status in database, defaulting to OPEN"
            );
            GrievanceStatus::Open
        });
        let priority = Priority::from_code(&self.priority).unwrap_or_else(|| {
            tracing::error!(
                ticket_id = %self.ticket_id,
                priority = %self.priority,
                "unknown grievance priority in database, defaulting to LOW"
            );
            Priority::Low
        });

        Ok(GrievanceRecord {
            ticket_id,
            user_id: self.user_id,
            category,
            description: self.description,
            audio_url: self.audio_url,
            attachment_url: self.attachment_url,
            status,
            priority,
            estimated_resolution: self.estimated_resolution,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
        })
    }
}
