//! Wire types of the Vensys customer API

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean energy yield for the current day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VensysMeanData {
    /// Energy yield in kWh
    #[serde(default)]
    pub value: f64,
}

impl VensysMeanData {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VensysMeanDataResponse {
    #[serde(default)]
    pub data: Option<VensysMeanData>,
}

/// Turbine performance summary over a time window.
///
/// Time fields are seconds spent in each state during the window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VensysPerformanceData {
    /// Turbine identifier
    pub tid: Option<String>,
    pub date: Option<NaiveDateTime>,
    /// Availability percentage
    pub availability: f64,
    /// Energy yield in kWh
    pub energy_yield: f64,
    pub power_avg: f64,
    pub power_max: f64,
    pub wind_avg: f64,
    pub wind_max: f64,
    pub values_count: i32,
    pub error_count: i32,
    pub power_production_time: f64,
    pub low_wind_time: f64,
    pub error_time: f64,
    pub service_time: f64,
    pub ice_time: f64,
    pub storm_time: f64,
    pub shadow_time: f64,
    pub twist_time: f64,
    pub grid_failure_time: f64,
    pub comm_failure_time: f64,
    pub visit_time: f64,
    pub server_stop_time: f64,
    pub fire_time: f64,
    pub bat_monitoring_time: f64,
    pub night_shutdown_time: f64,
}

impl VensysPerformanceData {
    /// An empty record stamped with `date`
    pub fn empty_at(date: NaiveDateTime) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }
}

/// Performance response. `data` entries may individually be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VensysPerformanceDataResponse {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Option<VensysPerformanceData>>>,
}

impl VensysPerformanceDataResponse {
    pub fn with_data(data: Vec<VensysPerformanceData>) -> Self {
        Self {
            from: None,
            to: None,
            data: Some(data.into_iter().map(Some).collect()),
        }
    }

    pub fn with_window(mut self, from: &str, to: &str) -> Self {
        self.from = Some(from.to_string());
        self.to = Some(to.to_string());
        self
    }

    /// The first entry, when the response carries one
    pub fn first(&self) -> Option<&VensysPerformanceData> {
        self.data
            .as_ref()
            .and_then(|data| data.first())
            .and_then(|entry| entry.as_ref())
    }
}
