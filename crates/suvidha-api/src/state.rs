//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor, plus the record types the stores persist.
//!
//! ## Architecture
//!
//! The storage backend and the identity provider are chosen once, at
//! startup, and held behind trait objects. Handlers never branch on which
//! backend is live.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use suvidha_core::{
    BillStatus, GrievanceCategory, GrievanceStatus, OrderId, PaymentMethod, PaymentStatus,
    Priority, ServiceType, TicketId, TransactionId, UserType,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{IdentityProvider, JwtIdentityProvider};
use crate::config::AppConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::store::memory::MemoryStore;
use crate::store::Store;

// -- Records ------------------------------------------------------------------

/// A registered citizen, kiosk or staff account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub city_zone: Option<String>,
    pub consumer_id: Option<String>,
    #[schema(value_type = String, example = "consumer")]
    pub user_type: UserType,
    pub language_preference: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// A fresh consumer account derived from an email address.
    ///
    /// The full name defaults to the title-cased local part and the
    /// consumer id to the upper-cased local part.
    pub fn new_consumer(email: &str, full_name: Option<String>) -> Self {
        let local = email.split('@').next().unwrap_or(email);
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            phone: None,
            full_name: Some(full_name.unwrap_or_else(|| title_case(local))),
            city_zone: None,
            consumer_id: Some(local.to_uppercase()),
            user_type: UserType::Consumer,
            language_preference: "en".to_string(),
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

/// Upper-case the first letter of each alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// A utility bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BillRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "electricity")]
    pub service_type: ServiceType,
    pub bill_number: Option<String>,
    pub amount_due: f64,
    pub due_date: DateTime<Utc>,
    pub units_consumed: Option<f64>,
    #[schema(value_type = String, example = "PENDING")]
    pub status: BillStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// A triaged grievance.
///
/// `priority` and `estimated_resolution` are fixed at creation and are
/// not recomputed when the description changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GrievanceRecord {
    #[schema(value_type = String, example = "GRV-1A2B3C4D")]
    pub ticket_id: TicketId,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "POWER_OUTAGE")]
    pub category: GrievanceCategory,
    pub description: String,
    pub audio_url: Option<String>,
    pub attachment_url: Option<String>,
    #[schema(value_type = String, example = "OPEN")]
    pub status: GrievanceStatus,
    #[schema(value_type = String, example = "HIGH")]
    pub priority: Priority,
    pub estimated_resolution: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A payment order and its gateway outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransactionRecord {
    #[schema(value_type = String, example = "TXN-0A1B2C3D4E5F")]
    pub transaction_id: TransactionId,
    #[schema(value_type = String, example = "ORDER-0A1B2C3D4E5F")]
    pub order_id: OrderId,
    pub user_id: Uuid,
    pub amount: f64,
    pub bill_ids: Vec<Uuid>,
    #[schema(value_type = String, example = "UPI")]
    pub payment_method: PaymentMethod,
    #[schema(value_type = String, example = "PENDING")]
    pub status: PaymentStatus,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

/// A city alert or announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlertRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub priority: String,
    pub category: String,
    pub published_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// -- Application State ----------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub metrics: ApiMetrics,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state over an already-selected store, with a JWT identity
    /// provider derived from the configuration.
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let identity = Arc::new(JwtIdentityProvider::from_config(&config));
        Self {
            config: Arc::new(config),
            store,
            identity,
            metrics: ApiMetrics::new(),
        }
    }

    /// Default configuration over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(AppConfig::default(), Arc::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_consumer_derives_names_from_email() {
        let user = UserRecord::new_consumer("asha.devi@example.in", None);
        assert_eq!(user.full_name.as_deref(), Some("Asha.Devi"));
        assert_eq!(user.consumer_id.as_deref(), Some("ASHA.DEVI"));
        assert_eq!(user.user_type, UserType::Consumer);
        assert_eq!(user.language_preference, "en");
        assert!(user.last_login.is_none());
    }

    #[test]
    fn explicit_full_name_is_kept() {
        let user = UserRecord::new_consumer("ravi@example.in", Some("Ravi Kumar".into()));
        assert_eq!(user.full_name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(user.consumer_id.as_deref(), Some("RAVI"));
    }

    #[test]
    fn title_case_matches_word_runs() {
        assert_eq!(title_case("john_DOE"), "John_Doe");
        assert_eq!(title_case("kc42user"), "Kc42User");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn grievance_record_serializes_wire_codes() {
        let record = GrievanceRecord {
            ticket_id: TicketId::parse("GRV-00AB11CD").unwrap(),
            user_id: Uuid::nil(),
            category: GrievanceCategory::PowerOutage,
            description: "No power".into(),
            audio_url: None,
            attachment_url: None,
            status: GrievanceStatus::Open,
            priority: Priority::High,
            estimated_resolution: "12 Hours".into(),
            created_at: Utc::now(),
            resolved_at: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ticket_id"], "GRV-00AB11CD");
        assert_eq!(json["category"], "POWER_OUTAGE");
        assert_eq!(json["status"], "OPEN");
        assert_eq!(json["priority"], "HIGH");
    }

    #[test]
    fn in_memory_state_uses_memory_backend() {
        let state = AppState::in_memory();
        assert_eq!(state.store.backend_name(), "memory");
        assert!(state.config.mock_mode);
    }
}
