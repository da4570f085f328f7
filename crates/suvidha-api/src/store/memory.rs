//! In-memory store for mock mode and tests.
//!
//! One `parking_lot::RwLock` guards all tables. Locks are taken and
//! released inside each method body and never held across an `.await`.
//! Lists come back in insertion order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use suvidha_core::{BillStatus, OrderId, PaymentStatus, TicketId};
use uuid::Uuid;

use super::{Store, StoreError};
use crate::state::{AlertRecord, BillRecord, GrievanceRecord, TransactionRecord, UserRecord};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRecord>,
    bills: Vec<BillRecord>,
    grievances: Vec<GrievanceRecord>,
    transactions: Vec<TransactionRecord>,
    alerts: Vec<AlertRecord>,
}

/// Thread-safe, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a city alert. Alerts have no API write path.
    pub fn insert_alert(&self, alert: AlertRecord) {
        self.tables.write().alerts.push(alert);
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("user email {}", user.email)));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(user) = self.tables.write().users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn list_bills(&self, user_id: Uuid) -> Result<Vec<BillRecord>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .bills
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_pending_bills(&self, user_id: Uuid) -> Result<Vec<BillRecord>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .bills
            .iter()
            .filter(|b| b.user_id == user_id && b.status == BillStatus::Pending)
            .cloned()
            .collect())
    }

    async fn create_bill(&self, bill: BillRecord) -> Result<BillRecord, StoreError> {
        self.tables.write().bills.push(bill.clone());
        Ok(bill)
    }

    async fn mark_bills_paid(
        &self,
        user_id: Uuid,
        bill_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let mut tables = self.tables.write();
        let mut changed = 0;
        for bill in tables
            .bills
            .iter_mut()
            .filter(|b| b.user_id == user_id && bill_ids.contains(&b.id))
        {
            bill.status = BillStatus::Paid;
            bill.paid_at = Some(at);
            changed += 1;
        }
        Ok(changed)
    }

    async fn create_grievance(
        &self,
        grievance: GrievanceRecord,
    ) -> Result<GrievanceRecord, StoreError> {
        let mut tables = self.tables.write();
        if tables
            .grievances
            .iter()
            .any(|g| g.ticket_id == grievance.ticket_id)
        {
            return Err(StoreError::Duplicate(format!(
                "ticket id {}",
                grievance.ticket_id
            )));
        }
        tables.grievances.push(grievance.clone());
        Ok(grievance)
    }

    async fn list_grievances(&self, user_id: Uuid) -> Result<Vec<GrievanceRecord>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .grievances
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_grievance(
        &self,
        ticket_id: &TicketId,
        user_id: Uuid,
    ) -> Result<Option<GrievanceRecord>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .grievances
            .iter()
            .find(|g| &g.ticket_id == ticket_id && g.user_id == user_id)
            .cloned())
    }

    async fn update_grievance_description(
        &self,
        ticket_id: &TicketId,
        user_id: Uuid,
        description: Option<String>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write();
        let Some(grievance) = tables
            .grievances
            .iter_mut()
            .find(|g| &g.ticket_id == ticket_id && g.user_id == user_id)
        else {
            return Ok(false);
        };
        if let Some(description) = description {
            grievance.description = description;
        }
        Ok(true)
    }

    async fn create_transaction(
        &self,
        transaction: TransactionRecord,
    ) -> Result<TransactionRecord, StoreError> {
        self.tables.write().transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn complete_transaction(
        &self,
        order_id: &OrderId,
        user_id: Uuid,
        payment_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let mut tables = self.tables.write();
        let Some(txn) = tables
            .transactions
            .iter_mut()
            .find(|t| &t.order_id == order_id && t.user_id == user_id)
        else {
            return Ok(None);
        };
        txn.status = PaymentStatus::Success;
        txn.payment_id = Some(payment_id.to_string());
        txn.verified_at = Some(at);
        Ok(Some(txn.clone()))
    }

    async fn active_alerts(&self) -> Result<Vec<AlertRecord>, StoreError> {
        let tables = self.tables.read();
        Ok(tables.alerts.iter().filter(|a| a.is_active).cloned().collect())
    }
}
