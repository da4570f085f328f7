//! # Dashboard API
//!
//! Kiosk home screen: outstanding dues, per-service totals, active
//! alerts and the caller's open grievances in a single call.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use suvidha_core::ServiceType;
use utoipa::ToSchema;
use uuid::Uuid;

use super::grievance::GrievanceResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::{AlertRecord, AppState, BillRecord};

// ── Request/Response DTOs ─────────────────────────────────────────

/// Pending total for one service, with its availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceCard {
    pub amount: f64,
    pub count: usize,
    /// `active` or `inactive`.
    pub status: String,
}

/// One card per service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceBreakdown {
    pub electricity: ServiceCard,
    pub water: ServiceCard,
    pub gas: ServiceCard,
}

impl ServiceBreakdown {
    fn from_pending(bills: &[BillRecord]) -> Self {
        let card = |service: ServiceType| {
            let matching = bills.iter().filter(|b| b.service_type == service);
            ServiceCard {
                amount: matching.clone().map(|b| b.amount_due).sum(),
                count: matching.count(),
                status: service_availability(service).to_string(),
            }
        };
        Self {
            electricity: card(ServiceType::Electricity),
            water: card(ServiceType::Water),
            gas: card(ServiceType::Gas),
        }
    }
}

/// Piped gas is not yet offered in the service area.
fn service_availability(service: ServiceType) -> &'static str {
    match service {
        ServiceType::Electricity | ServiceType::Water => "active",
        ServiceType::Gas => "inactive",
    }
}

/// Home screen aggregate.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub user_id: Uuid,
    pub total_due: f64,
    pub service_breakdown: ServiceBreakdown,
    pub pending_bills_count: usize,
    pub bills: Vec<BillRecord>,
    pub alerts: Vec<AlertRecord>,
    /// OPEN and IN_PROGRESS grievances only.
    pub grievances: Vec<GrievanceResponse>,
    pub grievances_count: usize,
}

/// Status line for one service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceStatuses {
    pub electricity: ServiceStatus,
    pub water: ServiceStatus,
    pub gas: ServiceStatus,
}

/// Kiosk-facing system status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SystemStatus {
    pub status: String,
    pub services: ServiceStatuses,
    pub cache: String,
    pub database: String,
    /// Active storage backend, `memory` or `postgres`.
    pub backend: String,
}

// ── Router ────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard/summary", get(summary))
        .route("/api/dashboard/status", get(status))
}

// ── Handlers ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "dashboard"
)]
async fn summary(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<DashboardSummary>, AppError> {
    let bills = state.store.list_pending_bills(caller.user_id).await?;
    let alerts = state.store.active_alerts().await?;
    let grievances: Vec<GrievanceResponse> = state
        .store
        .list_grievances(caller.user_id)
        .await?
        .into_iter()
        .filter(|g| g.status.is_active())
        .map(GrievanceResponse::from)
        .collect();

    Ok(Json(DashboardSummary {
        user_id: caller.user_id,
        total_due: bills.iter().map(|b| b.amount_due).sum(),
        service_breakdown: ServiceBreakdown::from_pending(&bills),
        pending_bills_count: bills.len(),
        bills,
        alerts,
        grievances_count: grievances.len(),
        grievances,
    }))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/status",
    responses((status = 200, description = "System status", body = SystemStatus)),
    tag = "dashboard"
)]
async fn status(State(state): State<AppState>) -> Json<SystemStatus> {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "store ping failed");
            "unavailable"
        }
    };

    Json(SystemStatus {
        status: "online".to_string(),
        services: ServiceStatuses {
            electricity: ServiceStatus {
                status: service_availability(ServiceType::Electricity).to_string(),
                load: Some("2.4kW".to_string()),
                next_reading: None,
                note: None,
            },
            water: ServiceStatus {
                status: service_availability(ServiceType::Water).to_string(),
                load: None,
                next_reading: Some("6 PM".to_string()),
                note: None,
            },
            gas: ServiceStatus {
                status: service_availability(ServiceType::Gas).to_string(),
                load: None,
                next_reading: None,
                note: Some("Not available in your area".to_string()),
            },
        },
        cache: "enabled".to_string(),
        database: database.to_string(),
        backend: state.store.backend_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use suvidha_core::BillStatus;

    fn bill(service: ServiceType, amount: f64) -> BillRecord {
        BillRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            service_type: service,
            bill_number: None,
            amount_due: amount,
            due_date: Utc::now(),
            units_consumed: None,
            status: BillStatus::Pending,
            created_at: Utc::now(),
            paid_at: None,
        }
    }

    #[test]
    fn breakdown_always_has_three_cards() {
        let b = ServiceBreakdown::from_pending(&[]);
        assert_eq!(b.electricity.count, 0);
        assert_eq!(b.electricity.status, "active");
        assert_eq!(b.water.status, "active");
        assert_eq!(b.gas.status, "inactive");
    }

    #[test]
    fn breakdown_sums_per_service() {
        let bills = vec![
            bill(ServiceType::Electricity, 100.0),
            bill(ServiceType::Electricity, 50.0),
            bill(ServiceType::Gas, 20.0),
        ];
        let b = ServiceBreakdown::from_pending(&bills);
        assert_eq!(b.electricity.count, 2);
        assert!((b.electricity.amount - 150.0).abs() < 1e-9);
        assert_eq!(b.water.count, 0);
        assert_eq!(b.gas.count, 1);
    }
}
