//! # City Data API
//!
//! Static bulletin for the kiosk ticker: weather, civic alerts and news
//! headlines. Unauthenticated.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::{AlertRecord, AppState};

// ── Request/Response DTOs ─────────────────────────────────────────

/// Current conditions for the configured city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherData {
    pub temperature: f64,
    pub humidity: f64,
    pub condition: String,
    pub feels_like: f64,
    pub location: String,
}

/// Weather, alerts and headlines in one payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CityDataResponse {
    pub weather: WeatherData,
    pub alerts: Vec<AlertRecord>,
    pub news_ticker: Vec<String>,
}

fn weather(location: &str) -> WeatherData {
    WeatherData {
        temperature: 32.5,
        humidity: 65.0,
        condition: "Partly Cloudy".to_string(),
        feels_like: 35.0,
        location: location.to_string(),
    }
}

/// Bulletin alerts, published relative to `now`.
pub fn bulletin_alerts(now: DateTime<Utc>) -> Vec<AlertRecord> {
    let alert = |id: &str, title: &str, content: &str, priority: &str, category: &str, at| {
        AlertRecord {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            priority: priority.to_string(),
            category: category.to_string(),
            published_at: at,
            is_active: true,
        }
    };
    vec![
        alert(
            "alert-1",
            "Scheduled Maintenance",
            "Water supply will be interrupted in Sector 4-6 from 10 AM to 2 PM for pipeline maintenance.",
            "MEDIUM",
            "MAINTENANCE",
            now,
        ),
        alert(
            "alert-2",
            "Payment Due Reminder",
            "Electricity bills for January 2024 are due. Please pay before the 25th to avoid late fees.",
            "LOW",
            "BILLING",
            now - Duration::hours(6),
        ),
        alert(
            "alert-3",
            "New Connection Camp",
            "Special camp for new water connection applications at Municipal Office this Saturday.",
            "LOW",
            "ANNOUNCEMENT",
            now - Duration::days(1),
        ),
    ]
}

const NEWS_TICKER: [&str; 5] = [
    "Smart City Project Phase 2 inaugurated by Mayor",
    "Solar-powered street lights being installed in all wards",
    "24/7 water supply to begin in North Zone next month",
    "Property tax discount for early payment extended",
    "New grievance portal launched - complaints resolved 40% faster",
];

fn news_ticker() -> Vec<String> {
    NEWS_TICKER.iter().map(|s| s.to_string()).collect()
}

// ── Router ────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/city-data", get(city_data))
        .route("/api/city-data/weather", get(get_weather))
        .route("/api/city-data/alerts", get(get_alerts))
        .route("/api/city-data/news-ticker", get(get_news_ticker))
}

// ── Handlers ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/city-data/weather",
    responses((status = 200, description = "Current weather", body = WeatherData)),
    tag = "city-data"
)]
async fn get_weather(State(state): State<AppState>) -> Json<WeatherData> {
    Json(weather(&state.config.city_location))
}

#[utoipa::path(
    get,
    path = "/api/city-data/alerts",
    responses((status = 200, description = "City alerts", body = Vec<AlertRecord>)),
    tag = "city-data"
)]
async fn get_alerts() -> Json<Vec<AlertRecord>> {
    Json(bulletin_alerts(Utc::now()))
}

#[utoipa::path(
    get,
    path = "/api/city-data/news-ticker",
    responses((status = 200, description = "Headlines", body = Vec<String>)),
    tag = "city-data"
)]
async fn get_news_ticker() -> Json<Vec<String>> {
    Json(news_ticker())
}

/// Weather, alerts and headlines together.
#[utoipa::path(
    get,
    path = "/api/city-data",
    responses((status = 200, description = "Combined city data", body = CityDataResponse)),
    tag = "city-data"
)]
async fn city_data(State(state): State<AppState>) -> Json<CityDataResponse> {
    Json(CityDataResponse {
        weather: weather(&state.config.city_location),
        alerts: bulletin_alerts(Utc::now()),
        news_ticker: news_ticker(),
    })
}
