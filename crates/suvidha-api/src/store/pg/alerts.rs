//! City alerts, read from `city_alerts`. Rows are maintained out of band.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::state::AlertRecord;
use crate::store::StoreError;

pub async fn list_active(pool: &PgPool) -> Result<Vec<AlertRecord>, StoreError> {
    let rows = sqlx::query_as::<_, AlertRow>(
        "SELECT id, title, content, priority, category, published_at, is_active
         FROM city_alerts WHERE is_active ORDER BY published_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(AlertRow::into_record).collect())
}

#[derive(sqlx::FromRow)]
struct AlertRow {
    id: String,
    title: String,
    content: String,
    priority: String,
    category: String,
    published_at: DateTime<Utc>,
    is_active: bool,
}

impl AlertRow {
    fn into_record(self) -> AlertRecord {
        AlertRecord {
            id: self.id,
            title: self.title,
            content: self.content,
            priority: self.priority,
            category: self.category,
            published_at: self.published_at,
            is_active: self.is_active,
        }
    }
}
