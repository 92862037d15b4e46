//! Savings rate persistence trait

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use energycoop_common::Site;

use crate::model::SavingsRate;

#[async_trait]
pub trait SavingsRatePersistence: Send + Sync {
    /// Create the rate for `(site, effective_date)` or update the existing one
    async fn savings_rate_upsert(
        &self,
        site: Site,
        effective_date: NaiveDate,
        rate_per_kwh: f64,
        user_id: &str,
        updated_at: NaiveDateTime,
    ) -> anyhow::Result<SavingsRate>;

    /// The rate in force on `date`: the latest with `effective_date <= date`
    async fn savings_rate_effective_on(
        &self,
        site: Site,
        date: NaiveDate,
    ) -> anyhow::Result<Option<SavingsRate>>;

    /// All rates for `site`, oldest effective date first
    async fn savings_rate_find_by_site(&self, site: Site) -> anyhow::Result<Vec<SavingsRate>>;
}
