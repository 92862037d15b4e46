//! Domain model types returned by the persistence traits
//!
//! Entities store the site as text; these types carry the parsed `Site` and
//! are what services and handlers work with.

use chrono::{NaiveDate, NaiveDateTime};
use energycoop_client::VensysPerformanceData;
use energycoop_common::Site;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{alert, generation_stat_entry, performance_stat_entry, savings_rate};

fn parse_site(value: &str) -> anyhow::Result<Site> {
    value
        .parse::<Site>()
        .map_err(|e| anyhow::anyhow!("corrupt site column: {}", e))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStat {
    pub id: i32,
    pub site: Site,
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl TryFrom<generation_stat_entry::Model> for GenerationStat {
    type Error = anyhow::Error;

    fn try_from(model: generation_stat_entry::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            site: parse_site(&model.site)?,
            timestamp: model.timestamp,
            value: model.value,
        })
    }
}

/// A stored daily performance summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStat {
    pub id: i32,
    pub site: Site,
    /// Day the summary covers
    pub day: NaiveDate,
    #[serde(flatten)]
    pub data: VensysPerformanceData,
}

impl TryFrom<performance_stat_entry::Model> for PerformanceStat {
    type Error = anyhow::Error;

    fn try_from(model: performance_stat_entry::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            site: parse_site(&model.site)?,
            day: model.date,
            data: VensysPerformanceData {
                tid: model.tid,
                date: model.reported_at,
                availability: model.availability,
                energy_yield: model.energy_yield,
                power_avg: model.power_avg,
                power_max: model.power_max,
                wind_avg: model.wind_avg,
                wind_max: model.wind_max,
                values_count: model.values_count,
                error_count: model.error_count,
                power_production_time: model.power_production_time,
                low_wind_time: model.low_wind_time,
                error_time: model.error_time,
                service_time: model.service_time,
                ice_time: model.ice_time,
                storm_time: model.storm_time,
                shadow_time: model.shadow_time,
                twist_time: model.twist_time,
                grid_failure_time: model.grid_failure_time,
                comm_failure_time: model.comm_failure_time,
                visit_time: model.visit_time,
                server_stop_time: model.server_stop_time,
                fire_time: model.fire_time,
                bat_monitoring_time: model.bat_monitoring_time,
                night_shutdown_time: model.night_shutdown_time,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i32,
    pub site: Site,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<alert::Model> for Alert {
    type Error = anyhow::Error;

    fn try_from(model: alert::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            site: parse_site(&model.site)?,
            message: model.message,
            created_at: model.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRate {
    pub id: i32,
    pub site: Site,
    pub effective_date: NaiveDate,
    #[serde(rename = "ratePerKWH")]
    pub rate_per_kwh: f64,
    pub last_updated_by_user: String,
    pub last_updated: NaiveDateTime,
}

impl TryFrom<savings_rate::Model> for SavingsRate {
    type Error = anyhow::Error;

    fn try_from(model: savings_rate::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            site: parse_site(&model.site)?,
            effective_date: model.effective_date,
            rate_per_kwh: model.rate_per_kwh,
            last_updated_by_user: model.last_updated_by_user,
            last_updated: model.last_updated,
        })
    }
}
