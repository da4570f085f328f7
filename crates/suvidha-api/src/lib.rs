//! # suvidha-api — Utility Self-Service Backend
//!
//! Axum service behind the SUVIDHA civic kiosks. Citizens sign in, view
//! and pay utility bills, and file grievances that are triaged on arrival
//! by [`suvidha_core::triage`].
//!
//! ## API Surface
//!
//! | Prefix               | Module                     | Auth |
//! |----------------------|----------------------------|------|
//! | `/api/auth/*`        | [`routes::auth`]           | `me` only |
//! | `/api/billing/*`     | [`routes::billing`]        | yes  |
//! | `/api/grievance/*`   | [`routes::grievance`]      | yes  |
//! | `/api/payments/*`    | [`routes::payments`]       | all but `methods` |
//! | `/api/city-data*`    | [`routes::city_data`]      | no   |
//! | `/api/dashboard/*`   | [`routes::dashboard`]      | `summary` only |
//!
//! Authentication is per handler via the [`auth::AuthUser`] extractor.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! Cors → TraceLayer → MetricsMiddleware → RateLimitMiddleware → Handler
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;

use axum::http::{HeaderValue, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{extract::State, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::AppConfig;
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    let limiter = RateLimiter::new(RateLimitConfig {
        max_requests: state.config.rate_limit_per_minute,
        window_secs: 60,
    });
    let cors = cors_layer(&state.config);

    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(routes::auth::router())
        .merge(routes::billing::router())
        .merge(routes::grievance::router())
        .merge(routes::payments::router())
        .merge(routes::city_data::router())
        .merge(routes::dashboard::router())
        .merge(openapi::router());

    if state.config.metrics_enabled {
        router = router.route("/metrics", get(prometheus_metrics));
    }

    router
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(cors)
        .layer(axum::Extension(metrics))
        .layer(axum::Extension(limiter))
        .with_state(state)
}

/// CORS for the configured kiosk front-end origins, with credentials.
///
/// Methods and headers mirror the preflight request; wildcards cannot be
/// combined with credentials.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[derive(Debug, Serialize)]
struct RootInfo {
    name: String,
    version: &'static str,
    status: &'static str,
    mock_mode: bool,
}

async fn root(State(state): State<AppState>) -> Json<RootInfo> {
    Json(RootInfo {
        name: state.config.app_name.clone(),
        version: AppConfig::VERSION,
        status: "online",
        mock_mode: state.config.mock_mode,
    })
}

#[derive(Debug, Serialize)]
struct HealthInfo {
    status: &'static str,
    database: String,
    timestamp: chrono::DateTime<Utc>,
}

/// Health probe. Reports 503 when the store does not answer.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (status, database) = match state.store.ping().await {
        Ok(()) if state.store.backend_name() == "memory" => {
            (StatusCode::OK, "connected (mock mode)".to_string())
        }
        Ok(()) => (StatusCode::OK, "connected".to_string()),
        Err(e) => {
            tracing::error!(error = %e, "health check: store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, "unreachable".to_string())
        }
    };
    let body = HealthInfo {
        status: if status == StatusCode::OK {
            "healthy"
        } else {
            "degraded"
        },
        database,
        timestamp: Utc::now(),
    };
    (status, Json(body))
}

/// Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => error::AppError::Internal(e).into_response(),
    }
}
