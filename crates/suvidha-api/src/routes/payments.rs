//! # Payments API
//!
//! Order creation and verification against a mocked gateway. Verifying
//! an order marks it SUCCESS and settles the bills it covers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use suvidha_core::{OrderId, PaymentMethod, PaymentStatus, TransactionId};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ApiResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, TransactionRecord};

// ── Request/Response DTOs ─────────────────────────────────────────

/// Open a payment order for a set of bills.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[schema(example = 2500.0)]
    pub amount: f64,
    pub bill_ids: Vec<Uuid>,
    #[serde(default)]
    #[schema(value_type = String, example = "UPI")]
    pub payment_method: PaymentMethod,
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("amount must be a positive number".to_string());
        }
        Ok(())
    }
}

/// Newly opened order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    #[schema(value_type = String)]
    pub transaction_id: TransactionId,
    #[schema(value_type = String)]
    pub order_id: OrderId,
    pub amount: f64,
    #[schema(value_type = String, example = "PENDING")]
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// Gateway confirmation for an order.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
}

impl Validate for VerifyPaymentRequest {
    fn validate(&self) -> Result<(), String> {
        if self.payment_id.trim().is_empty() {
            return Err("payment_id must not be empty".to_string());
        }
        Ok(())
    }
}

// ── Router ────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/payments/create-order", post(create_order))
        .route("/api/payments/verify", post(verify))
        .route("/api/payments/transactions", get(transactions))
        .route("/api/payments/methods", get(methods))
}

// ── Handlers ──────────────────────────────────────────────────────

/// Open a PENDING order.
#[utoipa::path(
    post,
    path = "/api/payments/create-order",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = PaymentResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid amount", body = crate::error::ErrorBody),
    ),
    tag = "payments"
)]
async fn create_order(
    State(state): State<AppState>,
    caller: AuthUser,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let record = state
        .store
        .create_transaction(TransactionRecord {
            transaction_id: TransactionId::generate(),
            order_id: OrderId::generate(),
            user_id: caller.user_id,
            amount: req.amount,
            bill_ids: req.bill_ids,
            payment_method: req.payment_method,
            status: PaymentStatus::Pending,
            payment_id: None,
            created_at: Utc::now(),
            verified_at: None,
        })
        .await?;

    tracing::info!(
        order_id = %record.order_id,
        user_id = %record.user_id,
        amount = record.amount,
        method = %record.payment_method,
        "payment order created"
    );

    Ok(Json(PaymentResponse {
        transaction_id: record.transaction_id,
        order_id: record.order_id,
        amount: record.amount,
        status: record.status,
        created_at: record.created_at,
    }))
}

/// Confirm an order and mark its bills PAID.
#[utoipa::path(
    post,
    path = "/api/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified", body = ApiResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorBody),
    ),
    tag = "payments"
)]
async fn verify(
    State(state): State<AppState>,
    caller: AuthUser,
    body: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let not_found = || AppError::NotFound("Order not found".to_string());
    let order_id = OrderId::parse(req.order_id.trim()).map_err(|_| not_found())?;
    let payment_id = req.payment_id.trim();
    let now = Utc::now();

    let txn = state
        .store
        .complete_transaction(&order_id, caller.user_id, payment_id, now)
        .await?
        .ok_or_else(not_found)?;
    let settled = state
        .store
        .mark_bills_paid(caller.user_id, &txn.bill_ids, now)
        .await?;

    tracing::info!(
        order_id = %order_id,
        user_id = %caller.user_id,
        bills_settled = settled,
        "payment verified"
    );

    Ok(Json(ApiResponse::ok("Payment verified successfully").with_data(
        serde_json::json!({
            "order_id": order_id,
            "payment_id": payment_id,
            "status": PaymentStatus::Success,
        }),
    )))
}

/// The caller's transactions, oldest first.
#[utoipa::path(
    get,
    path = "/api/payments/transactions",
    responses(
        (status = 200, description = "Transactions", body = Vec<TransactionRecord>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "payments"
)]
async fn transactions(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<TransactionRecord>>, AppError> {
    Ok(Json(state.store.list_transactions(caller.user_id).await?))
}

/// Accepted payment methods.
#[utoipa::path(
    get,
    path = "/api/payments/methods",
    responses(
        (status = 200, description = "Payment method codes", body = Vec<String>),
    ),
    tag = "payments"
)]
async fn methods() -> Json<Vec<&'static str>> {
    Json(PaymentMethod::all().iter().map(PaymentMethod::as_str).collect())
}
