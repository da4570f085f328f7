//! # Billing API
//!
//! Read-only views over the caller's utility bills.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::{AppState, BillRecord};

/// Bills due within this many days count as due soon. Overdue bills are
/// included.
const DUE_SOON_DAYS: i64 = 7;

// ── Request/Response DTOs ─────────────────────────────────────────

/// Pending total for one service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceTotals {
    pub count: usize,
    pub amount: f64,
}

/// Aggregate over the caller's PENDING bills.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillSummary {
    pub total_due: f64,
    pub pending_bills: usize,
    /// Keyed by service type (`electricity`, `water`, `gas`).
    pub service_breakdown: BTreeMap<String, ServiceTotals>,
    pub due_soon: Vec<BillRecord>,
}

impl BillSummary {
    /// Summarise `pending` as of `now`.
    pub fn compute(pending: Vec<BillRecord>, now: DateTime<Utc>) -> Self {
        let horizon = now + Duration::days(DUE_SOON_DAYS);
        let mut service_breakdown: BTreeMap<String, ServiceTotals> = BTreeMap::new();
        let mut total_due = 0.0;

        for bill in &pending {
            total_due += bill.amount_due;
            let entry = service_breakdown
                .entry(bill.service_type.as_str().to_string())
                .or_default();
            entry.count += 1;
            entry.amount += bill.amount_due;
        }

        let pending_bills = pending.len();
        let due_soon = pending
            .into_iter()
            .filter(|b| b.due_date <= horizon)
            .collect();

        Self {
            total_due,
            pending_bills,
            service_breakdown,
            due_soon,
        }
    }
}

// ── Router ────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/billing/bills", get(list_bills))
        .route("/api/billing/summary", get(summary))
        .route("/api/billing/bills/:bill_id", get(get_bill))
}

// ── Handlers ──────────────────────────────────────────────────────

/// All of the caller's bills.
#[utoipa::path(
    get,
    path = "/api/billing/bills",
    responses(
        (status = 200, description = "Bills", body = Vec<BillRecord>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "billing"
)]
async fn list_bills(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<BillRecord>>, AppError> {
    Ok(Json(state.store.list_bills(caller.user_id).await?))
}

/// Pending total, per-service breakdown and bills due soon.
#[utoipa::path(
    get,
    path = "/api/billing/summary",
    responses(
        (status = 200, description = "Billing summary", body = BillSummary),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "billing"
)]
async fn summary(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<BillSummary>, AppError> {
    let pending = state.store.list_pending_bills(caller.user_id).await?;
    Ok(Json(BillSummary::compute(pending, Utc::now())))
}

/// One of the caller's bills.
#[utoipa::path(
    get,
    path = "/api/billing/bills/{bill_id}",
    params(("bill_id" = String, Path, description = "Bill UUID")),
    responses(
        (status = 200, description = "Bill", body = BillRecord),
        (status = 404, description = "Bill not found", body = crate::error::ErrorBody),
    ),
    tag = "billing"
)]
async fn get_bill(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(bill_id): Path<String>,
) -> Result<Json<BillRecord>, AppError> {
    let not_found = || AppError::NotFound("Bill not found".to_string());
    let bill_id = Uuid::parse_str(&bill_id).map_err(|_| not_found())?;
    state
        .store
        .list_bills(caller.user_id)
        .await?
        .into_iter()
        .find(|b| b.id == bill_id)
        .map(Json)
        .ok_or_else(not_found)
}
