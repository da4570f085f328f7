//! # Grievance API
//!
//! Submission runs the triage engine from `suvidha-core`: the description
//! and category fix the ticket's priority and SLA once, at creation.
//! Later description edits never re-triage.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use suvidha_core::triage::extract;
use suvidha_core::{triage, GrievanceCategory, GrievanceStatus, TicketId};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ApiResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::{AppState, GrievanceRecord};
use crate::store::StoreError;

/// Fresh ticket ids tried before a collision is reported.
const TICKET_ATTEMPTS: usize = 3;

// ── Request/Response DTOs ─────────────────────────────────────────

/// A new complaint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitGrievanceRequest {
    #[schema(value_type = String, example = "POWER_OUTAGE")]
    pub category: GrievanceCategory,
    #[schema(example = "No power since 2 hours in Sector 4")]
    pub description: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

impl Validate for SubmitGrievanceRequest {
    fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        Ok(())
    }
}

/// Description edit. Absent or blank leaves the ticket unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateGrievanceRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// A triaged grievance as returned to citizens.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GrievanceResponse {
    #[schema(value_type = String, example = "GRV-1A2B3C4D")]
    pub ticket_id: TicketId,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "POWER_OUTAGE")]
    pub category: GrievanceCategory,
    pub description: String,
    #[schema(value_type = String, example = "OPEN")]
    pub status: GrievanceStatus,
    #[schema(value_type = String, example = "CRITICAL")]
    pub priority: suvidha_core::Priority,
    #[schema(example = "2 Hours")]
    pub estimated_resolution: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<GrievanceRecord> for GrievanceResponse {
    fn from(g: GrievanceRecord) -> Self {
        Self {
            ticket_id: g.ticket_id,
            user_id: g.user_id,
            category: g.category,
            description: g.description,
            status: g.status,
            priority: g.priority,
            estimated_resolution: g.estimated_resolution,
            created_at: g.created_at,
            resolved_at: g.resolved_at,
        }
    }
}

// ── Router ────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/grievance/submit", post(submit))
        .route("/api/grievance/list", get(list))
        .route(
            "/api/grievance/:ticket_id",
            get(get_grievance).put(update_grievance),
        )
}

// ── Handlers ──────────────────────────────────────────────────────

/// Submit a grievance. Priority, SLA and ticket id come from triage.
#[utoipa::path(
    post,
    path = "/api/grievance/submit",
    request_body = SubmitGrievanceRequest,
    responses(
        (status = 200, description = "Grievance created", body = GrievanceResponse),
        (status = 400, description = "Malformed body or unknown category", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
        (status = 422, description = "Blank description", body = crate::error::ErrorBody),
    ),
    tag = "grievance"
)]
async fn submit(
    State(state): State<AppState>,
    caller: AuthUser,
    body: Result<Json<SubmitGrievanceRequest>, JsonRejection>,
) -> Result<Json<GrievanceResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let outcome = triage(&req.description, req.category);
    let entities = extract(&req.description);

    let mut record = GrievanceRecord {
        ticket_id: outcome.ticket_id,
        user_id: caller.user_id,
        category: req.category,
        description: req.description,
        audio_url: req.audio_url,
        attachment_url: req.attachment_url,
        status: GrievanceStatus::Open,
        priority: outcome.priority,
        estimated_resolution: outcome.estimated_resolution.to_string(),
        created_at: Utc::now(),
        resolved_at: None,
    };

    let mut attempt = 1;
    let created = loop {
        match state.store.create_grievance(record.clone()).await {
            Ok(created) => break created,
            Err(StoreError::Duplicate(_)) if attempt < TICKET_ATTEMPTS => {
                tracing::warn!(ticket_id = %record.ticket_id, "ticket id collision, regenerating");
                record.ticket_id = TicketId::generate();
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    };

    state.metrics.record_grievance(created.priority);
    tracing::info!(
        ticket_id = %created.ticket_id,
        user_id = %created.user_id,
        category = %created.category,
        priority = %created.priority,
        basis = %outcome.basis,
        location = ?entities.location,
        consumer_id = ?entities.consumer_id,
        phone = ?entities.phone,
        "grievance submitted"
    );

    Ok(Json(GrievanceResponse::from(created)))
}

/// The caller's grievances, oldest first.
#[utoipa::path(
    get,
    path = "/api/grievance/list",
    responses(
        (status = 200, description = "Grievances", body = Vec<GrievanceResponse>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "grievance"
)]
async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<GrievanceResponse>>, AppError> {
    let grievances = state.store.list_grievances(caller.user_id).await?;
    Ok(Json(grievances.into_iter().map(GrievanceResponse::from).collect()))
}

/// One of the caller's grievances.
#[utoipa::path(
    get,
    path = "/api/grievance/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket id, e.g. GRV-1A2B3C4D")),
    responses(
        (status = 200, description = "Grievance", body = GrievanceResponse),
        (status = 404, description = "Grievance not found", body = crate::error::ErrorBody),
    ),
    tag = "grievance"
)]
async fn get_grievance(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(ticket_id): Path<String>,
) -> Result<Json<GrievanceResponse>, AppError> {
    let ticket_id = parse_ticket(&ticket_id)?;
    state
        .store
        .get_grievance(&ticket_id, caller.user_id)
        .await?
        .map(|g| Json(GrievanceResponse::from(g)))
        .ok_or_else(grievance_not_found)
}

/// Replace a grievance's description. Priority and SLA are unchanged.
#[utoipa::path(
    put,
    path = "/api/grievance/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket id, e.g. GRV-1A2B3C4D")),
    request_body = UpdateGrievanceRequest,
    responses(
        (status = 200, description = "Grievance updated", body = ApiResponse),
        (status = 404, description = "Grievance not found", body = crate::error::ErrorBody),
    ),
    tag = "grievance"
)]
async fn update_grievance(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(ticket_id): Path<String>,
    body: Result<Json<UpdateGrievanceRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, AppError> {
    let req = extract_json(body)?;
    let ticket_id = parse_ticket(&ticket_id)?;
    let description = req.description.filter(|d| !d.trim().is_empty());

    let found = state
        .store
        .update_grievance_description(&ticket_id, caller.user_id, description)
        .await?;
    if !found {
        return Err(grievance_not_found());
    }

    tracing::info!(ticket_id = %ticket_id, user_id = %caller.user_id, "grievance updated");
    Ok(Json(ApiResponse::ok("Grievance updated successfully")))
}

fn grievance_not_found() -> AppError {
    AppError::NotFound("Grievance not found".to_string())
}

/// A malformed ticket id cannot name any grievance.
fn parse_ticket(raw: &str) -> Result<TicketId, AppError> {
    TicketId::parse(raw).map_err(|_| grievance_not_found())
}
