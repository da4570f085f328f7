//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SUVIDHA Backend",
        version = "0.1.0",
        description = "Utility self-service kiosk backend: citizen accounts, bills, grievance triage and tracking, payments, and city bulletins.",
        license(name = "MIT")
    ),
    paths(
        // Auth
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::logout,
        // Billing
        crate::routes::billing::list_bills,
        crate::routes::billing::summary,
        crate::routes::billing::get_bill,
        // Grievance
        crate::routes::grievance::submit,
        crate::routes::grievance::list,
        crate::routes::grievance::get_grievance,
        crate::routes::grievance::update_grievance,
        // Payments
        crate::routes::payments::create_order,
        crate::routes::payments::verify,
        crate::routes::payments::transactions,
        crate::routes::payments::methods,
        // City data
        crate::routes::city_data::city_data,
        crate::routes::city_data::get_weather,
        crate::routes::city_data::get_alerts,
        crate::routes::city_data::get_news_ticker,
        // Dashboard
        crate::routes::dashboard::summary,
        crate::routes::dashboard::status,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::ApiResponse,
        // Records
        crate::state::UserRecord,
        crate::state::BillRecord,
        crate::state::GrievanceRecord,
        crate::state::TransactionRecord,
        crate::state::AlertRecord,
        // Auth DTOs
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::TokenResponse,
        crate::routes::auth::TokenUser,
        crate::routes::auth::UserResponse,
        // Billing DTOs
        crate::routes::billing::BillSummary,
        crate::routes::billing::ServiceTotals,
        // Grievance DTOs
        crate::routes::grievance::SubmitGrievanceRequest,
        crate::routes::grievance::UpdateGrievanceRequest,
        crate::routes::grievance::GrievanceResponse,
        // Payment DTOs
        crate::routes::payments::CreateOrderRequest,
        crate::routes::payments::PaymentResponse,
        crate::routes::payments::VerifyPaymentRequest,
        // City data DTOs
        crate::routes::city_data::WeatherData,
        crate::routes::city_data::CityDataResponse,
        // Dashboard DTOs
        crate::routes::dashboard::DashboardSummary,
        crate::routes::dashboard::ServiceBreakdown,
        crate::routes::dashboard::ServiceCard,
        crate::routes::dashboard::SystemStatus,
        crate::routes::dashboard::ServiceStatuses,
        crate::routes::dashboard::ServiceStatus,
    )),
    tags(
        (name = "auth", description = "Citizen accounts and access tokens"),
        (name = "billing", description = "Utility bills"),
        (name = "grievance", description = "Grievance submission with automatic triage"),
        (name = "payments", description = "Payment orders (mocked gateway)"),
        (name = "city-data", description = "Weather, alerts and news bulletin"),
        (name = "dashboard", description = "Kiosk home screen"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
