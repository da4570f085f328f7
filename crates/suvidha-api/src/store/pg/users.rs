//! User persistence operations on the `users` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use suvidha_core::UserType;
use uuid::Uuid;

use super::map_unique;
use crate::state::UserRecord;
use crate::store::StoreError;

const COLUMNS: &str = "id, email, phone, full_name, city_zone, consumer_id, user_type, \
                       language_preference, created_at, last_login";

/// Insert a new user. A taken email is [`StoreError::Duplicate`].
pub async fn insert(pool: &PgPool, user: &UserRecord) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO users (id, email, phone, full_name, city_zone, consumer_id, user_type,
                            language_preference, created_at, last_login)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(&user.full_name)
    .bind(&user.city_zone)
    .bind(&user.consumer_id)
    .bind(user.user_type.as_str())
    .bind(&user.language_preference)
    .bind(user.created_at)
    .bind(user.last_login)
    .execute(pool)
    .await
    .map_err(|e| map_unique(e, || format!("user email {}", user.email)))?;

    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>, StoreError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserRow::into_record))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
    let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(UserRow::into_record))
}

pub async fn touch_last_login(
    pool: &PgPool,
    id: Uuid,
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
        .bind(at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    phone: Option<String>,
    full_name: Option<String>,
    city_zone: Option<String>,
    consumer_id: Option<String>,
    user_type: String,
    language_preference: String,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_record(self) -> UserRecord {
        let user_type = UserType::from_code(&self.user_type).unwrap_or_else(|| {
            tracing::error!(
                id = %self.id,
                user_type = %self.user_type,
                "unknown user type in database, defaulting to consumer"
            );
            UserType::default()
        });

        UserRecord {
            id: self.id,
            email: self.email,
            phone: self.phone,
            full_name: self.full_name,
            city_zone: self.city_zone,
            consumer_id: self.consumer_id,
            user_type,
            language_preference: self.language_preference,
            created_at: self.created_at,
            last_login: self.last_login,
        }
    }
}
