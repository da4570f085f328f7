//! # Persistence
//!
//! The [`Store`] trait is the only way handlers reach persisted data. Two
//! implementations exist:
//!
//! - [`memory::MemoryStore`]: `parking_lot::RwLock` tables, used in mock
//!   mode and in tests. State does not survive restarts.
//! - [`pg::PgStore`]: the hosted Postgres database via `sqlx`, with
//!   embedded migrations.
//!
//! [`connect`] picks one, once, at startup.
//!
//! All per-user reads and writes are scoped by `user_id`: another user's
//! record behaves exactly like a missing one.

pub mod memory;
pub mod pg;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use suvidha_core::{OrderId, TicketId};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::state::{AlertRecord, BillRecord, GrievanceRecord, TransactionRecord, UserRecord};

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations could not be applied.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A unique key already exists.
    #[error("duplicate {0}")]
    Duplicate(String),

    /// A stored row could not be mapped back to a record.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Persistence operations used by the route handlers.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// `"memory"` or `"postgres"`.
    fn backend_name(&self) -> &'static str;

    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), StoreError>;

    // -- users --

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a user. Fails with [`StoreError::Duplicate`] if the email is taken.
    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, StoreError>;

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    // -- bills --

    async fn list_bills(&self, user_id: Uuid) -> Result<Vec<BillRecord>, StoreError>;

    async fn list_pending_bills(&self, user_id: Uuid) -> Result<Vec<BillRecord>, StoreError>;

    async fn create_bill(&self, bill: BillRecord) -> Result<BillRecord, StoreError>;

    /// Mark the caller's listed bills PAID. Returns how many changed.
    async fn mark_bills_paid(
        &self,
        user_id: Uuid,
        bill_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> Result<usize, StoreError>;

    // -- grievances --

    async fn create_grievance(
        &self,
        grievance: GrievanceRecord,
    ) -> Result<GrievanceRecord, StoreError>;

    async fn list_grievances(&self, user_id: Uuid) -> Result<Vec<GrievanceRecord>, StoreError>;

    async fn get_grievance(
        &self,
        ticket_id: &TicketId,
        user_id: Uuid,
    ) -> Result<Option<GrievanceRecord>, StoreError>;

    /// Replace the description when `Some`. Returns whether the grievance
    /// exists for this user. Priority and SLA are left untouched.
    async fn update_grievance_description(
        &self,
        ticket_id: &TicketId,
        user_id: Uuid,
        description: Option<String>,
    ) -> Result<bool, StoreError>;

    // -- transactions --

    async fn create_transaction(
        &self,
        transaction: TransactionRecord,
    ) -> Result<TransactionRecord, StoreError>;

    async fn list_transactions(&self, user_id: Uuid)
        -> Result<Vec<TransactionRecord>, StoreError>;

    /// Mark the caller's order SUCCESS with the gateway payment id.
    async fn complete_transaction(
        &self,
        order_id: &OrderId,
        user_id: Uuid,
        payment_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<TransactionRecord>, StoreError>;

    // -- alerts --

    async fn active_alerts(&self) -> Result<Vec<AlertRecord>, StoreError>;
}

/// Select and initialize the storage backend.
///
/// Postgres when `MOCK_MODE=false` and `DATABASE_URL` is set; any
/// connection or migration failure is returned. Otherwise the in-memory
/// store.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.database_url.as_deref() {
        Some(url) if config.uses_database() => {
            let pool = pg::init_pool(url).await?;
            Ok(Arc::new(pg::PgStore::new(pool)))
        }
        Some(_) => {
            tracing::info!("MOCK_MODE enabled; ignoring DATABASE_URL and using the in-memory store");
            Ok(Arc::new(memory::MemoryStore::new()))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set; running in-memory only mode. \
                 State will not survive restarts."
            );
            Ok(Arc::new(memory::MemoryStore::new()))
        }
    }
}
