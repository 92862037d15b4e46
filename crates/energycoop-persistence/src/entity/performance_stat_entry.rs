//! Daily performance summary, one row per site and day (unique key
//! `uq_performance_stat_entry_site_date`, created by `ensure_schema`)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "performance_stat_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub site: String,
    pub date: Date,
    #[sea_orm(nullable)]
    pub tid: Option<String>,
    /// Start of the reported window as sent by the telemetry API
    #[sea_orm(nullable)]
    pub reported_at: Option<DateTime>,
    pub availability: f64,
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
