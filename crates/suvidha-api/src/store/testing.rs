//! Fault-injecting store for handler tests.
//!
//! Wraps a [`MemoryStore`] and can report ticket-id collisions or serve
//! stale user lookups, reproducing races the memory store never loses.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use suvidha_core::{OrderId, TicketId};
use uuid::Uuid;

use super::memory::MemoryStore;
use super::{Store, StoreError};
use crate::state::{AlertRecord, BillRecord, GrievanceRecord, TransactionRecord, UserRecord};

#[derive(Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    ticket_collisions: AtomicUsize,
    stale_email_lookups: AtomicUsize,
    attempted_tickets: Mutex<Vec<TicketId>>,
}

/// Decrement `counter` if positive; true when a fault should fire.
fn take(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl FlakyStore {
    /// The first `n` grievance inserts fail with a duplicate ticket id.
    pub(crate) fn with_ticket_collisions(n: usize) -> Self {
        Self {
            ticket_collisions: AtomicUsize::new(n),
            ..Self::default()
        }
    }

    /// The first `n` email lookups miss, as if another request had not
    /// yet committed its insert.
    pub(crate) fn with_stale_email_lookups(n: usize) -> Self {
        Self {
            stale_email_lookups: AtomicUsize::new(n),
            ..Self::default()
        }
    }

    /// The backing store, bypassing injected faults.
    pub(crate) fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Every ticket id passed to `create_grievance`, in order.
    pub(crate) fn attempted_tickets(&self) -> Vec<TicketId> {
        self.attempted_tickets.lock().clone()
    }
}

#[async_trait::async_trait]
impl Store for FlakyStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        if take(&self.stale_email_lookups) {
            return Ok(None);
        }
        self.inner.find_user_by_email(email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        self.inner.find_user_by_id(id).await
    }

    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        self.inner.create_user(user).await
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.inner.touch_last_login(id, at).await
    }

    async fn list_bills(&self, user_id: Uuid) -> Result<Vec<BillRecord>, StoreError> {
        self.inner.list_bills(user_id).await
    }

    async fn list_pending_bills(&self, user_id: Uuid) -> Result<Vec<BillRecord>, StoreError> {
        self.inner.list_pending_bills(user_id).await
    }

    async fn create_bill(&self, bill: BillRecord) -> Result<BillRecord, StoreError> {
        self.inner.create_bill(bill).await
    }

    async fn mark_bills_paid(
        &self,
        user_id: Uuid,
        bill_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        self.inner.mark_bills_paid(user_id, bill_ids, at).await
    }

    async fn create_grievance(
        &self,
        grievance: GrievanceRecord,
    ) -> Result<GrievanceRecord, StoreError> {
        self.attempted_tickets.lock().push(grievance.ticket_id.clone());
        if take(&self.ticket_collisions) {
            return Err(StoreError::Duplicate(format!(
                "grievance ticket {}",
                grievance.ticket_id
            )));
        }
        self.inner.create_grievance(grievance).await
    }

    async fn list_grievances(&self, user_id: Uuid) -> Result<Vec<GrievanceRecord>, StoreError> {
        self.inner.list_grievances(user_id).await
    }

    async fn get_grievance(
        &self,
        ticket_id: &TicketId,
        user_id: Uuid,
    ) -> Result<Option<GrievanceRecord>, StoreError> {
        self.inner.get_grievance(ticket_id, user_id).await
    }

    async fn update_grievance_description(
        &self,
        ticket_id: &TicketId,
        user_id: Uuid,
        description: Option<String>,
    ) -> Result<bool, StoreError> {
        self.inner
            .update_grievance_description(ticket_id, user_id, description)
            .await
    }

    async fn create_transaction(
        &self,
        transaction: TransactionRecord,
    ) -> Result<TransactionRecord, StoreError> {
        self.inner.create_transaction(transaction).await
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        self.inner.list_transactions(user_id).await
    }

    async fn complete_transaction(
        &self,
        order_id: &OrderId,
        user_id: Uuid,
        payment_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        self.inner
            .complete_transaction(order_id, user_id, payment_id, at)
            .await
    }

    async fn active_alerts(&self) -> Result<Vec<AlertRecord>, StoreError> {
        self.inner.active_alerts().await
    }
}
