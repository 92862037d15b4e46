//! Savings rates per site

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use energycoop_common::{EnergyCoopError, Site};
use energycoop_persistence::{PersistenceService, SavingsRate};
use tracing::info;

pub struct SavingsRateService {
    persistence: Arc<dyn PersistenceService>,
}

impl SavingsRateService {
    pub fn new(persistence: Arc<dyn PersistenceService>) -> Self {
        Self { persistence }
    }

    /// Set the rate in force from `effective_date`, replacing any rate
    /// already set for that date.
    pub async fn set_savings_rate_for_date(
        &self,
        site: Site,
        effective_date: NaiveDate,
        rate_per_kwh: f64,
        user_id: &str,
    ) -> anyhow::Result<SavingsRate> {
        if !rate_per_kwh.is_finite() || rate_per_kwh < 0.0 {
            return Err(EnergyCoopError::IllegalArgument(format!(
                "ratePerKWH must be a non-negative number, got {}",
                rate_per_kwh
            ))
            .into());
        }

        info!(
            site = %site,
            effective_date = %effective_date,
            rate_per_kwh = rate_per_kwh,
            user_id = user_id,
            "Setting savings rate"
        );

        self.persistence
            .savings_rate_upsert(
                site,
                effective_date,
                rate_per_kwh,
                user_id,
                Local::now().naive_local(),
            )
            .await
    }

    pub async fn rate_for_date(&self, site: Site, date: NaiveDate) -> anyhow::Result<Option<f64>> {
        Ok(self
            .persistence
            .savings_rate_effective_on(site, date)
            .await?
            .map(|rate| rate.rate_per_kwh))
    }

    pub async fn get_rates(&self, site: Site) -> anyhow::Result<Vec<SavingsRate>> {
        self.persistence.savings_rate_find_by_site(site).await
    }
}
