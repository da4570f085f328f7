//! # Postgres Persistence
//!
//! [`PgStore`] implements [`Store`] over a `sqlx` pool. Each table has a
//! module of free functions taking `&PgPool`; this file only wires them to
//! the trait.
//!
//! Enumerations are stored as their wire codes. A code the application
//! does not recognise is logged and mapped to a fallback value rather than
//! failing the whole read.

pub mod alerts;
pub mod bills;
pub mod grievances;
pub mod transactions;
pub mod users;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use suvidha_core::{OrderId, TicketId};
use uuid::Uuid;

use super::{Store, StoreError};
use crate::state::{AlertRecord, BillRecord, GrievanceRecord, TransactionRecord, UserRecord};

/// Connect to Postgres and apply the embedded migrations.
pub async fn init_pool(url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Map a unique-key violation to [`StoreError::Duplicate`].
pub(crate) fn map_unique(err: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(what()),
        _ => StoreError::Database(err),
    }
}

/// Postgres-backed [`Store`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        users::find_by_email(&self.pool, email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        users::find_by_id(&self.pool, id).await
    }

    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        users::insert(&self.pool, &user).await?;
        Ok(user)
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        users::touch_last_login(&self.pool, id, at).await
    }

    async fn list_bills(&self, user_id: Uuid) -> Result<Vec<BillRecord>, StoreError> {
        bills::list_for_user(&self.pool, user_id, false).await
    }

    async fn list_pending_bills(&self, user_id: Uuid) -> Result<Vec<BillRecord>, StoreError> {
        bills::list_for_user(&self.pool, user_id, true).await
    }

    async fn create_bill(&self, bill: BillRecord) -> Result<BillRecord, StoreError> {
        bills::insert(&self.pool, &bill).await?;
        Ok(bill)
    }

    async fn mark_bills_paid(
        &self,
        user_id: Uuid,
        bill_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        bills::mark_paid(&self.pool, user_id, bill_ids, at).await
    }

    async fn create_grievance(
        &self,
        grievance: GrievanceRecord,
    ) -> Result<GrievanceRecord, StoreError> {
        grievances::insert(&self.pool, &grievance).await?;
        Ok(grievance)
    }

    async fn list_grievances(&self, user_id: Uuid) -> Result<Vec<GrievanceRecord>, StoreError> {
        grievances::list_for_user(&self.pool, user_id).await
    }

    async fn get_grievance(
        &self,
        ticket_id: &TicketId,
        user_id: Uuid,
    ) -> Result<Option<GrievanceRecord>, StoreError> {
        grievances::get(&self.pool, ticket_id, user_id).await
    }

    async fn update_grievance_description(
        &self,
        ticket_id: &TicketId,
        user_id: Uuid,
        description: Option<String>,
    ) -> Result<bool, StoreError> {
        grievances::update_description(&self.pool, ticket_id, user_id, description.as_deref())
            .await
    }

    async fn create_transaction(
        &self,
        transaction: TransactionRecord,
    ) -> Result<TransactionRecord, StoreError> {
        transactions::insert(&self.pool, &transaction).await?;
        Ok(transaction)
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        transactions::list_for_user(&self.pool, user_id).await
    }

    async fn complete_transaction(
        &self,
        order_id: &OrderId,
        user_id: Uuid,
        payment_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        transactions::complete(&self.pool, order_id, user_id, payment_id, at).await
    }

    async fn active_alerts(&self) -> Result<Vec<AlertRecord>, StoreError> {
        alerts::list_active(&self.pool).await
    }
}
