//! Generation and performance statistics persistence trait

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use energycoop_client::VensysPerformanceData;
use energycoop_common::Site;

use crate::model::{GenerationStat, PerformanceStat};

#[async_trait]
pub trait StatsPersistence: Send + Sync {
    /// Store a mean energy yield snapshot
    async fn generation_save(
        &self,
        site: Site,
        timestamp: NaiveDateTime,
        value: f64,
    ) -> anyhow::Result<GenerationStat>;

    /// Newest snapshot for `site` with `from <= timestamp <= to`
    async fn generation_find_latest(
        &self,
        site: Site,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Option<GenerationStat>>;

    /// Insert or replace the summary for `site` on `day`
    async fn performance_upsert(
        &self,
        site: Site,
        day: NaiveDate,
        data: &VensysPerformanceData,
    ) -> anyhow::Result<PerformanceStat>;

    /// Summaries with `from <= day <= to`, oldest first
    async fn performance_find_between(
        &self,
        site: Site,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<PerformanceStat>>;
}
