//! SQL-based persistence backend (PostgreSQL in production, SQLite in tests)
//!
//! Implements the persistence traits with direct SeaORM queries against a
//! `DatabaseConnection`.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use energycoop_client::VensysPerformanceData;
use energycoop_common::Site;
use sea_orm::sea_query::{Index, IndexCreateStatement, OnConflict};
use sea_orm::{prelude::Expr, *};

use crate::entity::{alert, generation_stat_entry, performance_stat_entry, savings_rate};
use crate::model::*;
use crate::traits::*;

/// External database persistence service
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    /// Create a new ExternalDbPersistService with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Create any missing tables from the entity definitions, plus the
    /// unique keys the upserts conflict on
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut statements = [
            schema.create_table_from_entity(generation_stat_entry::Entity),
            schema.create_table_from_entity(performance_stat_entry::Entity),
            schema.create_table_from_entity(alert::Entity),
            schema.create_table_from_entity(savings_rate::Entity),
        ];

        for statement in statements.iter_mut() {
            statement.if_not_exists();
            self.db.execute(backend.build(&*statement)).await?;
        }

        for index in unique_keys() {
            self.db.execute(backend.build(&index)).await?;
        }

        Ok(())
    }
}

fn unique_keys() -> [IndexCreateStatement; 2] {
    [
        Index::create()
            .name("uq_performance_stat_entry_site_date")
            .table(performance_stat_entry::Entity)
            .col(performance_stat_entry::Column::Site)
            .col(performance_stat_entry::Column::Date)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_savings_rate_site_effective_date")
            .table(savings_rate::Entity)
            .col(savings_rate::Column::Site)
            .col(savings_rate::Column::EffectiveDate)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}

fn into_models<M, T>(models: Vec<M>) -> anyhow::Result<Vec<T>>
where
    T: TryFrom<M, Error = anyhow::Error>,
{
    models.into_iter().map(T::try_from).collect()
}

// ============================================================================
// PersistenceService implementation
// ============================================================================

#[async_trait]
impl PersistenceService for ExternalDbPersistService {
    async fn health_check(&self) -> anyhow::Result<()> {
        alert::Entity::find()
            .select_only()
            .column_as(Expr::cust("1"), "health")
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(())
    }
}

// ============================================================================
// StatsPersistence implementation
// ============================================================================

fn apply_performance(
    active: &mut performance_stat_entry::ActiveModel,
    data: &VensysPerformanceData,
) {
    active.tid = Set(data.tid.clone());
    active.reported_at = Set(data.date);
    active.availability = Set(data.availability);
    active.energy_yield = Set(data.energy_yield);
    active.power_avg = Set(data.power_avg);
    active.power_max = Set(data.power_max);
    active.wind_avg = Set(data.wind_avg);
    active.wind_max = Set(data.wind_max);
    active.values_count = Set(data.values_count);
    active.error_count = Set(data.error_count);
    active.power_production_time = Set(data.power_production_time);
    active.low_wind_time = Set(data.low_wind_time);
    active.error_time = Set(data.error_time);
    active.service_time = Set(data.service_time);
    active.ice_time = Set(data.ice_time);
    active.storm_time = Set(data.storm_time);
    active.shadow_time = Set(data.shadow_time);
    active.twist_time = Set(data.twist_time);
    active.grid_failure_time = Set(data.grid_failure_time);
    active.comm_failure_time = Set(data.comm_failure_time);
    active.visit_time = Set(data.visit_time);
    active.server_stop_time = Set(data.server_stop_time);
    active.fire_time = Set(data.fire_time);
    active.bat_monitoring_time = Set(data.bat_monitoring_time);
    active.night_shutdown_time = Set(data.night_shutdown_time);
}

#[async_trait]
impl StatsPersistence for ExternalDbPersistService {
    async fn generation_save(
        &self,
        site: Site,
        timestamp: NaiveDateTime,
        value: f64,
    ) -> anyhow::Result<GenerationStat> {
        let entry = generation_stat_entry::ActiveModel {
            site: Set(site.to_string()),
            timestamp: Set(timestamp),
            value: Set(value),
            ..Default::default()
        };

        entry.insert(&self.db).await?.try_into()
    }

    async fn generation_find_latest(
        &self,
        site: Site,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Option<GenerationStat>> {
        let entry = generation_stat_entry::Entity::find()
            .filter(generation_stat_entry::Column::Site.eq(site.as_str()))
            .filter(generation_stat_entry::Column::Timestamp.between(from, to))
            .order_by_desc(generation_stat_entry::Column::Timestamp)
            .order_by_desc(generation_stat_entry::Column::Id)
            .one(&self.db)
            .await?;

        entry.map(GenerationStat::try_from).transpose()
    }

    async fn performance_upsert(
        &self,
        site: Site,
        day: NaiveDate,
        data: &VensysPerformanceData,
    ) -> anyhow::Result<PerformanceStat> {
        use performance_stat_entry::Column;

        let mut active = performance_stat_entry::ActiveModel {
            site: Set(site.to_string()),
            date: Set(day),
            ..Default::default()
        };
        apply_performance(&mut active, data);

        let metrics = Column::iter()
            .filter(|c| !matches!(c, Column::Id | Column::Site | Column::Date));

        let saved = performance_stat_entry::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([Column::Site, Column::Date])
                    .update_columns(metrics)
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        saved.try_into()
    }

    async fn performance_find_between(
        &self,
        site: Site,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<PerformanceStat>> {
        let entries = performance_stat_entry::Entity::find()
            .filter(performance_stat_entry::Column::Site.eq(site.as_str()))
            .filter(performance_stat_entry::Column::Date.between(from, to))
            .order_by_asc(performance_stat_entry::Column::Date)
            .all(&self.db)
            .await?;

        into_models(entries)
    }
}

// ============================================================================
// AlertPersistence implementation
// ============================================================================

#[async_trait]
impl AlertPersistence for ExternalDbPersistService {
    async fn alert_save(
        &self,
        site: Site,
        message: &str,
        created_at: NaiveDateTime,
    ) -> anyhow::Result<Alert> {
        let entry = alert::ActiveModel {
            site: Set(site.to_string()),
            message: Set(message.to_string()),
            created_at: Set(created_at),
            ..Default::default()
        };

        entry.insert(&self.db).await?.try_into()
    }

    async fn alert_find_latest(&self, site: Site, limit: u64) -> anyhow::Result<Vec<Alert>> {
        let entries = alert::Entity::find()
            .filter(alert::Column::Site.eq(site.as_str()))
            .order_by_desc(alert::Column::CreatedAt)
            .order_by_desc(alert::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        into_models(entries)
    }
}

// ============================================================================
// SavingsRatePersistence implementation
// ============================================================================

#[async_trait]
impl SavingsRatePersistence for ExternalDbPersistService {
    async fn savings_rate_upsert(
        &self,
        site: Site,
        effective_date: NaiveDate,
        rate_per_kwh: f64,
        user_id: &str,
        updated_at: NaiveDateTime,
    ) -> anyhow::Result<SavingsRate> {
        use savings_rate::Column;

        let active = savings_rate::ActiveModel {
            site: Set(site.to_string()),
            effective_date: Set(effective_date),
            rate_per_kwh: Set(rate_per_kwh),
            last_updated_by_user: Set(user_id.to_string()),
            last_updated: Set(updated_at),
            ..Default::default()
        };

        let saved = savings_rate::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([Column::Site, Column::EffectiveDate])
                    .update_columns([
                        Column::RatePerKwh,
                        Column::LastUpdatedByUser,
                        Column::LastUpdated,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        saved.try_into()
    }

    async fn savings_rate_effective_on(
        &self,
        site: Site,
        date: NaiveDate,
    ) -> anyhow::Result<Option<SavingsRate>> {
        let entry = savings_rate::Entity::find()
            .filter(savings_rate::Column::Site.eq(site.as_str()))
            .filter(savings_rate::Column::EffectiveDate.lte(date))
            .order_by_desc(savings_rate::Column::EffectiveDate)
            .one(&self.db)
            .await?;

        entry.map(SavingsRate::try_from).transpose()
    }

    async fn savings_rate_find_by_site(&self, site: Site) -> anyhow::Result<Vec<SavingsRate>> {
        let entries = savings_rate::Entity::find()
            .filter(savings_rate::Column::Site.eq(site.as_str()))
            .order_by_asc(savings_rate::Column::EffectiveDate)
            .all(&self.db)
            .await?;

        into_models(entries)
    }
}
