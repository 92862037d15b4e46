use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Money saved per kWh, effective from `effective_date` until the next rate
/// for the same site
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "savings_rate")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub site: String,
    pub effective_date: Date,
    pub rate_per_kwh: f64,
    pub last_updated_by_user: String,
    pub last_updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
