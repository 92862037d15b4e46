//! Request and response bodies of the HTTP API

use chrono::NaiveDate;
use energycoop_common::Site;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /admin/savings-rate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRateRequest {
    pub site: Site,
    /// `yyyy-MM-dd`
    pub effective_date: NaiveDate,
    #[serde(rename = "ratePerKWH")]
    pub rate_per_kwh: f64,
}

/// Storage health
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// `UP` or `DOWN`
    pub status: String,
}

impl HealthStatus {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
        }
    }

    pub fn down() -> Self {
        Self {
            status: "DOWN".to_string(),
        }
    }
}
