use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mean energy yield snapshot taken by the scheduler
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "generation_stat_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub site: String,
    pub timestamp: DateTime,
    /// kWh generated so far that day
    pub value: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
