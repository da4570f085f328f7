//! # API Route Modules
//!
//! - `auth`: register, login, current user, logout.
//! - `billing`: the caller's bills and a pending-bill summary.
//! - `grievance`: triaged grievance submission, listing and edits.
//! - `payments`: mocked gateway orders and verification.
//! - `city_data`: static weather, alerts and news bulletin.
//! - `dashboard`: kiosk home screen aggregate and service status.

pub mod auth;
pub mod billing;
pub mod city_data;
pub mod dashboard;
pub mod grievance;
pub mod payments;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic success envelope for write endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
