//! Member savings for Graig Fatha

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use energycoop_common::{EnergyCoopError, Site, day_end, day_start};
use energycoop_persistence::PersistenceService;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::savings_rate::SavingsRateService;
use super::stats::GraigFathaStatsService;
use super::tax_document::{TaxStatement, render_tax_document};

/// Money a member saved over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnergySaving {
    pub amount: f64,
    pub currency: String,
    /// The member's share of the generated energy
    pub energy_kwh: f64,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

pub struct GraigFathaMemberService {
    stats: Arc<GraigFathaStatsService>,
    savings_rates: Arc<SavingsRateService>,
    persistence: Arc<dyn PersistenceService>,
    capacity_watts: f64,
    currency: String,
}

impl GraigFathaMemberService {
    pub fn new(
        stats: Arc<GraigFathaStatsService>,
        savings_rates: Arc<SavingsRateService>,
        persistence: Arc<dyn PersistenceService>,
        capacity_watts: f64,
        currency: String,
    ) -> Self {
        Self {
            stats,
            savings_rates,
            persistence,
            capacity_watts,
            currency,
        }
    }

    /// Savings from today's generation so far
    pub async fn get_today_savings(&self, ownership_watts: Option<f64>) -> anyhow::Result<EnergySaving> {
        let share = self.share(ownership_watts)?;
        let now = Local::now().naive_local();
        let today = now.date();

        let stored = self
            .persistence
            .generation_find_latest(Site::GraigFatha, day_start(today), day_end(today))
            .await?
            .map(|stat| stat.value);

        let generated_kwh = match stored {
            Some(value) => value,
            None => self
                .stats
                .get_mean_energy_yield()
                .await?
                .map(|mean| mean.value)
                .unwrap_or_default(),
        };

        let rate = self
            .savings_rates
            .rate_for_date(Site::GraigFatha, today)
            .await?;

        Ok(self.saving(generated_kwh * share, rate, day_start(today), now))
    }

    /// One saving per recorded day in `[from, to]`, oldest first
    pub async fn get_savings(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        ownership_watts: Option<f64>,
        user_id: &str,
    ) -> anyhow::Result<Vec<EnergySaving>> {
        let share = self.share(ownership_watts)?;
        info!(user_id = user_id, "get_savings() called from: {}, to: {}", from, to);

        if from > to {
            return Ok(Vec::new());
        }

        let stats = self
            .persistence
            .performance_find_between(Site::GraigFatha, from, to)
            .await?;

        let mut savings = Vec::with_capacity(stats.len());
        for stat in stats {
            let rate = self
                .savings_rates
                .rate_for_date(Site::GraigFatha, stat.day)
                .await?;
            savings.push(self.saving(
                stat.data.energy_yield * share,
                rate,
                day_start(stat.day),
                day_end(stat.day),
            ));
        }

        Ok(savings)
    }

    /// A PDF statement of the savings in `[from, to]`
    pub async fn generate_tax_document(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        ownership_watts: Option<f64>,
        user_id: &str,
    ) -> anyhow::Result<Vec<u8>> {
        if from > to {
            return Err(EnergyCoopError::IllegalArgument(format!(
                "from ({}) must not be after to ({})",
                from, to
            ))
            .into());
        }

        let savings = self.get_savings(from, to, ownership_watts, user_id).await?;

        render_tax_document(&TaxStatement {
            user_id,
            site: Site::GraigFatha,
            from,
            to,
            currency: &self.currency,
            savings: &savings,
        })
    }

    fn share(&self, ownership_watts: Option<f64>) -> anyhow::Result<f64> {
        let watts = ownership_watts.ok_or(EnergyCoopError::MissingOwnership(Site::GraigFatha))?;
        Ok(watts / self.capacity_watts)
    }

    fn saving(
        &self,
        energy_kwh: f64,
        rate: Option<f64>,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> EnergySaving {
        EnergySaving {
            amount: energy_kwh * rate.unwrap_or_default(),
            currency: self.currency.clone(),
            energy_kwh,
            from,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use energycoop_client::{VensysMeanData, VensysMeanDataResponse, VensysPerformanceData};

    use super::*;
    use crate::service::alert::AlertService;
    use crate::service::stats::AlertThresholds;
    use crate::service::testing::{FakeVensysClient, sqlite_persistence};

    const CAPACITY: f64 = 500_000.0;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn service(client: FakeVensysClient) -> (GraigFathaMemberService, Arc<dyn PersistenceService>) {
        let persistence = sqlite_persistence().await;
        let alerts = Arc::new(AlertService::new(persistence.clone(), None, 10));
        let stats = Arc::new(GraigFathaStatsService::new(
            Arc::new(client),
            persistence.clone(),
            alerts,
            AlertThresholds {
                availability: 75.0,
                failure_time: 100.0,
            },
        ));
        let rates = Arc::new(SavingsRateService::new(persistence.clone()));
        let service = GraigFathaMemberService::new(
            stats,
            rates,
            persistence.clone(),
            CAPACITY,
            "GBP".to_string(),
        );
        (service, persistence)
    }

    async fn store_day(persistence: &Arc<dyn PersistenceService>, day: NaiveDate, energy_yield: f64) {
        persistence
            .performance_upsert(
                Site::GraigFatha,
                day,
                &VensysPerformanceData {
                    energy_yield,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    async fn set_rate(persistence: &Arc<dyn PersistenceService>, day: NaiveDate, rate: f64) {
        persistence
            .savings_rate_upsert(Site::GraigFatha, day, rate, "admin", day_start(day))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_ownership_is_an_error() {
        let (service, _) = service(FakeVensysClient::default()).await;

        let err = service.get_today_savings(None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EnergyCoopError>(),
            Some(EnergyCoopError::MissingOwnership(Site::GraigFatha))
        ));
    }

    #[tokio::test]
    async fn test_today_savings_uses_stored_snapshot() {
        let (service, persistence) = service(FakeVensysClient::default()).await;
        let now = Local::now().naive_local();
        persistence
            .generation_save(Site::GraigFatha, day_start(now.date()), 10_000.0)
            .await
            .unwrap();
        set_rate(&persistence, date(2000, 1, 1), 0.5).await;

        let saving = service.get_today_savings(Some(5_000.0)).await.unwrap();
        assert_eq!(saving.energy_kwh, 100.0);
        assert_eq!(saving.amount, 50.0);
        assert_eq!(saving.currency, "GBP");
        assert_eq!(saving.from, day_start(now.date()));
    }

    #[tokio::test]
    async fn test_today_savings_falls_back_to_live_yield_without_rate() {
        let client = FakeVensysClient {
            mean: Some(VensysMeanDataResponse {
                data: Some(VensysMeanData::new(2_000.0)),
            }),
            ..Default::default()
        };
        let (service, _) = service(client).await;

        let saving = service.get_today_savings(Some(250_000.0)).await.unwrap();
        assert_eq!(saving.energy_kwh, 1_000.0);
        assert_eq!(saving.amount, 0.0);
    }

    #[tokio::test]
    async fn test_savings_per_recorded_day() {
        let (service, persistence) = service(FakeVensysClient::default()).await;
        store_day(&persistence, date(2024, 3, 1), 1_000.0).await;
        store_day(&persistence, date(2024, 3, 3), 2_000.0).await;
        store_day(&persistence, date(2024, 4, 1), 9_999.0).await;
        set_rate(&persistence, date(2024, 1, 1), 0.1).await;
        set_rate(&persistence, date(2024, 3, 2), 0.2).await;

        let savings = service
            .get_savings(date(2024, 3, 1), date(2024, 3, 31), Some(50_000.0), "member")
            .await
            .unwrap();

        assert_eq!(savings.len(), 2);
        assert_eq!(savings[0].energy_kwh, 100.0);
        assert!((savings[0].amount - 10.0).abs() < 1e-9);
        assert_eq!(savings[0].from, day_start(date(2024, 3, 1)));
        assert_eq!(savings[0].to, day_end(date(2024, 3, 1)));
        assert_eq!(savings[1].energy_kwh, 200.0);
        assert!((savings[1].amount - 40.0).abs() < 1e-9);

        let reversed = service
            .get_savings(date(2024, 3, 31), date(2024, 3, 1), Some(50_000.0), "member")
            .await
            .unwrap();
        assert!(reversed.is_empty());
    }

    #[tokio::test]
    async fn test_tax_document() {
        let (service, persistence) = service(FakeVensysClient::default()).await;
        store_day(&persistence, date(2024, 3, 1), 1_000.0).await;

        let pdf = service
            .generate_tax_document(date(2024, 3, 1), date(2024, 3, 31), Some(50_000.0), "member")
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF-"));

        let err = service
            .generate_tax_document(date(2024, 3, 31), date(2024, 3, 1), Some(50_000.0), "member")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EnergyCoopError>(),
            Some(EnergyCoopError::IllegalArgument(_))
        ));
    }
}
