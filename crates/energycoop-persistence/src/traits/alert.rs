use async_trait::async_trait;
use chrono::NaiveDateTime;
use energycoop_common::Site;

use crate::model::Alert;

/// Alert persistence operations
#[async_trait]
pub trait AlertPersistence: Send + Sync {
    async fn alert_save(
        &self,
        site: Site,
        message: &str,
        created_at: NaiveDateTime,
    ) -> anyhow::Result<Alert>;

    /// Newest `limit` alerts for `site`, newest first
    async fn alert_find_latest(&self, site: Site, limit: u64) -> anyhow::Result<Vec<Alert>>;
}
