//! Graig Fatha turbine statistics
//!
//! Fetches telemetry from Vensys, raises alerts on unhealthy performance
//! and records daily summaries.

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use energycoop_client::{
    VensysClient, VensysMeanData, VensysPerformanceData, VensysPerformanceDataResponse,
};
use energycoop_common::utils::to_epoch_seconds;
use energycoop_common::{Site, day_end, day_start, days_between, format_decimal};
use energycoop_persistence::PersistenceService;
use tracing::{error, info, warn};

use super::alert::AlertService;

/// Limits beyond which a performance summary raises an alert
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Availability percentage at or below which an alert is raised
    pub availability: f64,
    /// Seconds of fire, comm failure, grid failure or error time above
    /// which an alert is raised
    pub failure_time: f64,
}

pub struct GraigFathaStatsService {
    client: Arc<dyn VensysClient>,
    persistence: Arc<dyn PersistenceService>,
    alert_service: Arc<AlertService>,
    thresholds: AlertThresholds,
}

impl GraigFathaStatsService {
    pub fn new(
        client: Arc<dyn VensysClient>,
        persistence: Arc<dyn PersistenceService>,
        alert_service: Arc<AlertService>,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            client,
            persistence,
            alert_service,
            thresholds,
        }
    }

    /// Today's mean energy yield, falling back to the current performance
    /// summary when Vensys has no mean value.
    pub async fn get_mean_energy_yield(&self) -> anyhow::Result<Option<VensysMeanData>> {
        info!("get_mean_energy_yield() called");

        let mean = self
            .client
            .get_mean_energy_yield()
            .await?
            .and_then(|response| response.data);

        if mean.is_some() {
            return Ok(mean);
        }

        warn!("No mean energy yield data available from client, falling back to current performance data");

        Ok(self
            .get_current_performance()
            .await?
            .map(|performance| VensysMeanData::new(performance.energy_yield)))
    }

    pub async fn get_yesterday_performance(&self) -> anyhow::Result<VensysPerformanceData> {
        info!("get_yesterday_performance() called");

        let yesterday = yesterday();
        let from = day_start(yesterday);

        match self.get_performance(from, day_end(yesterday)).await? {
            Some(performance) => Ok(performance),
            None => {
                warn!("No performance data available for yesterday, returning empty data");
                Ok(VensysPerformanceData::empty_at(from))
            }
        }
    }

    /// Performance summary for `[from, to]`. Every response is validated and
    /// alerted on before the first entry is returned.
    pub async fn get_performance(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Option<VensysPerformanceData>> {
        info!("get_performance() called from: {}, to: {}", from, to);

        let response = self
            .client
            .get_performance(to_epoch_seconds(from), to_epoch_seconds(to))
            .await?;

        self.validate_performance_data(response.as_ref()).await;

        let performance = response.as_ref().and_then(|r| r.first()).cloned();
        if performance.is_none() {
            warn!("No performance data available for period {} to {}", from, to);
        }

        Ok(performance)
    }

    /// Record one performance summary per day in `[from, to]`
    pub async fn log_performance(&self, from: NaiveDate, to: NaiveDate) -> anyhow::Result<()> {
        info!("log_performance() called from: {}, to: {}", from, to);

        for day in days_between(from, to) {
            match self.get_performance(day_start(day), day_end(day)).await? {
                Some(performance) => {
                    self.persistence
                        .performance_upsert(Site::GraigFatha, day, &performance)
                        .await?;
                    info!("Persisted performance data for date: {}", day);
                }
                None => warn!("No valid performance data available for date: {}", day),
            }
        }

        Ok(())
    }

    /// Persist yesterday's performance summary
    pub async fn log_yesterday_performance(&self) -> anyhow::Result<()> {
        let yesterday = yesterday();
        self.log_performance(yesterday, yesterday).await
    }

    /// Persist a snapshot of the current mean energy yield. Returns whether
    /// anything was stored.
    pub async fn log_energy_yield(&self) -> anyhow::Result<bool> {
        match self.get_mean_energy_yield().await? {
            Some(mean) => {
                self.persistence
                    .generation_save(Site::GraigFatha, Local::now().naive_local(), mean.value)
                    .await?;
                info!("Persisted mean energy yield: {}", mean.value);
                Ok(true)
            }
            None => {
                warn!("No energy yield data available to persist");
                Ok(false)
            }
        }
    }

    async fn get_current_performance(&self) -> anyhow::Result<Option<VensysPerformanceData>> {
        info!("get_current_performance() called");

        let performance = self
            .client
            .get_current_performance()
            .await?
            .as_ref()
            .and_then(|r| r.first())
            .cloned();

        if performance.is_none() {
            warn!("No current performance data available");
        }

        Ok(performance)
    }

    async fn validate_performance_data(&self, response: Option<&VensysPerformanceDataResponse>) {
        let Some(message) = performance_alert_message(response, &self.thresholds) else {
            return;
        };

        if let Err(e) = self.alert_service.send_alert(Site::GraigFatha, &message).await {
            error!("Failed to send performance alert: {:#}", e);
        }
    }
}

fn yesterday() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// The alert text for a performance response, or `None` when it is healthy
pub fn performance_alert_message(
    response: Option<&VensysPerformanceDataResponse>,
    thresholds: &AlertThresholds,
) -> Option<String> {
    let mut message = String::new();

    match response {
        None => message.push_str("Performance response is null.\n"),
        Some(VensysPerformanceDataResponse { data: None, .. }) => {
            message.push_str("Performance data array is null.\n")
        }
        Some(VensysPerformanceDataResponse {
            data: Some(data), ..
        }) if data.is_empty() => message.push_str("Performance data array is empty.\n"),
        Some(VensysPerformanceDataResponse {
            data: Some(data), ..
        }) => match data.first().and_then(|entry| entry.as_ref()) {
            None => message.push_str("First performance data entry is null.\n"),
            Some(performance) => append_threshold_breaches(&mut message, performance, thresholds),
        },
    }

    if message.is_empty() {
        return None;
    }

    let window = match response {
        Some(VensysPerformanceDataResponse {
            from: Some(from),
            to: Some(to),
            ..
        }) => format!("{} -> {}\n", from, to),
        _ => "Unknown".to_string(),
    };

    Some(format!("({}): {}", window, message))
}

fn append_threshold_breaches(
    message: &mut String,
    performance: &VensysPerformanceData,
    thresholds: &AlertThresholds,
) {
    let limit = format_decimal(thresholds.failure_time);

    if thresholds.availability >= performance.availability {
        message.push_str(&format!(
            "Availability ({}%) less than threshold ({}%).\n",
            format_decimal(performance.availability),
            format_decimal(thresholds.availability)
        ));
    }

    let failure_times = [
        ("Fire time", performance.fire_time),
        ("Comm failure time", performance.comm_failure_time),
        ("Grid failure time", performance.grid_failure_time),
        ("Error time", performance.error_time),
    ];

    for (label, seconds) in failure_times {
        if thresholds.failure_time < seconds {
            message.push_str(&format!(
                "{} ({}s) exceeds threshold ({}s).\n",
                label,
                format_decimal(seconds),
                limit
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use energycoop_client::{VensysMeanDataResponse, VensysPerformanceDataResponse};

    use super::*;
    use crate::service::testing::{FakeVensysClient, sqlite_persistence};

    const THRESHOLDS: AlertThresholds = AlertThresholds {
        availability: 75.0,
        failure_time: 100.0,
    };

    fn healthy() -> VensysPerformanceData {
        VensysPerformanceData {
            availability: 99.0,
            energy_yield: 1234.5,
            ..Default::default()
        }
    }

    async fn service(
        client: FakeVensysClient,
    ) -> (GraigFathaStatsService, Arc<FakeVensysClient>, Arc<dyn PersistenceService>) {
        let client = Arc::new(client);
        let persistence = sqlite_persistence().await;
        let alerts = Arc::new(AlertService::new(persistence.clone(), None, 10));
        let service =
            GraigFathaStatsService::new(client.clone(), persistence.clone(), alerts, THRESHOLDS);
        (service, client, persistence)
    }

    async fn alerts(persistence: &Arc<dyn PersistenceService>) -> Vec<String> {
        persistence
            .alert_find_latest(Site::GraigFatha, 100)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.message)
            .collect()
    }

    #[test]
    fn test_alert_message_for_missing_data() {
        assert_eq!(
            performance_alert_message(None, &THRESHOLDS).as_deref(),
            Some("(Unknown): Performance response is null.\n")
        );

        let response = VensysPerformanceDataResponse::default();
        assert_eq!(
            performance_alert_message(Some(&response), &THRESHOLDS).as_deref(),
            Some("(Unknown): Performance data array is null.\n")
        );

        let response = VensysPerformanceDataResponse::with_data(vec![]);
        assert_eq!(
            performance_alert_message(Some(&response), &THRESHOLDS).as_deref(),
            Some("(Unknown): Performance data array is empty.\n")
        );

        let response = VensysPerformanceDataResponse {
            data: Some(vec![None]),
            ..Default::default()
        }
        .with_window("2025-11-05T00:00:00", "2025-11-05T23:59:59");
        assert_eq!(
            performance_alert_message(Some(&response), &THRESHOLDS).as_deref(),
            Some(
                "(2025-11-05T00:00:00 -> 2025-11-05T23:59:59\n): First performance data entry is null.\n"
            )
        );
    }

    #[test]
    fn test_alert_message_aggregates_breaches() {
        let response = VensysPerformanceDataResponse::with_data(vec![VensysPerformanceData {
            availability: 70.0,
            fire_time: 150.5,
            comm_failure_time: 101.0,
            grid_failure_time: 200.0,
            error_time: 100.0,
            ..Default::default()
        }])
        .with_window("A", "B");

        assert_eq!(
            performance_alert_message(Some(&response), &THRESHOLDS).as_deref(),
            Some(
                "(A -> B\n): Availability (70.0%) less than threshold (75.0%).\n\
                 Fire time (150.5s) exceeds threshold (100.0s).\n\
                 Comm failure time (101.0s) exceeds threshold (100.0s).\n\
                 Grid failure time (200.0s) exceeds threshold (100.0s).\n"
            )
        );
    }

    #[test]
    fn test_alert_message_threshold_boundaries() {
        let at_threshold = VensysPerformanceDataResponse::with_data(vec![VensysPerformanceData {
            availability: 75.0,
            ..Default::default()
        }]);
        assert_eq!(
            performance_alert_message(Some(&at_threshold), &THRESHOLDS).as_deref(),
            Some("(Unknown): Availability (75.0%) less than threshold (75.0%).\n")
        );

        let healthy = VensysPerformanceDataResponse::with_data(vec![VensysPerformanceData {
            availability: 75.1,
            error_time: 100.0,
            ..Default::default()
        }]);
        assert!(performance_alert_message(Some(&healthy), &THRESHOLDS).is_none());
    }

    #[tokio::test]
    async fn test_mean_energy_yield_prefers_mean_data() {
        let client = FakeVensysClient {
            mean: Some(VensysMeanDataResponse {
                data: Some(VensysMeanData::new(42.0)),
            }),
            current: Some(VensysPerformanceDataResponse::with_data(vec![healthy()])),
            ..Default::default()
        };
        let (service, _, _) = service(client).await;

        assert_eq!(
            service.get_mean_energy_yield().await.unwrap(),
            Some(VensysMeanData::new(42.0))
        );
    }

    #[tokio::test]
    async fn test_mean_energy_yield_falls_back_without_alerting() {
        let client = FakeVensysClient {
            mean: Some(VensysMeanDataResponse { data: None }),
            current: Some(VensysPerformanceDataResponse::with_data(vec![
                VensysPerformanceData {
                    availability: 10.0,
                    energy_yield: 777.0,
                    ..Default::default()
                },
            ])),
            ..Default::default()
        };
        let (service, _, persistence) = service(client).await;

        assert_eq!(
            service.get_mean_energy_yield().await.unwrap(),
            Some(VensysMeanData::new(777.0))
        );
        assert!(alerts(&persistence).await.is_empty());
    }

    #[tokio::test]
    async fn test_mean_energy_yield_none_when_nothing_available() {
        let (service, _, persistence) = service(FakeVensysClient::default()).await;

        assert_eq!(service.get_mean_energy_yield().await.unwrap(), None);
        assert!(alerts(&persistence).await.is_empty());
        assert!(!service.log_energy_yield().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_performance_sends_single_alert() {
        let client = FakeVensysClient {
            performance: Some(VensysPerformanceDataResponse::with_data(vec![
                VensysPerformanceData {
                    availability: 50.0,
                    error_time: 500.0,
                    ..Default::default()
                },
            ])),
            ..Default::default()
        };
        let (service, client, persistence) = service(client).await;

        let from = day_start(NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
        let to = day_end(NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
        let performance = service.get_performance(from, to).await.unwrap().unwrap();

        assert_eq!(performance.availability, 50.0);
        assert_eq!(client.performance_windows(), vec![(1762300800, 1762387199)]);

        let alerts = alerts(&persistence).await;
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("Availability (50.0%)"));
        assert!(alerts[0].contains("Error time (500.0s)"));
    }

    #[tokio::test]
    async fn test_yesterday_performance_defaults_when_missing() {
        let (service, _, persistence) = service(FakeVensysClient::default()).await;

        let performance = service.get_yesterday_performance().await.unwrap();
        assert_eq!(performance.date, Some(day_start(yesterday())));
        assert_eq!(performance.energy_yield, 0.0);
        assert_eq!(
            alerts(&persistence).await,
            vec!["(Unknown): Performance response is null.\n".to_string()]
        );
    }

    #[tokio::test]
    async fn test_log_performance_persists_each_day() {
        let client = FakeVensysClient {
            performance: Some(VensysPerformanceDataResponse::with_data(vec![healthy()])),
            ..Default::default()
        };
        let (service, client, persistence) = service(client).await;

        let from = NaiveDate::from_ymd_opt(2025, 10, 30).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        service.log_performance(from, to).await.unwrap();
        service.log_performance(from, from).await.unwrap();

        assert_eq!(client.performance_windows().len(), 4);
        let stored = persistence
            .performance_find_between(Site::GraigFatha, from, to)
            .await
            .unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].day, from);
        assert!(alerts(&persistence).await.is_empty());
    }

    #[tokio::test]
    async fn test_log_performance_skips_missing_days() {
        let (service, client, persistence) = service(FakeVensysClient::default()).await;

        let from = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        service.log_performance(from, to).await.unwrap();
        service.log_performance(to, from).await.unwrap();

        assert_eq!(client.performance_windows().len(), 2);
        assert!(
            persistence
                .performance_find_between(Site::GraigFatha, from, to)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_log_energy_yield_saves_snapshot() {
        let client = FakeVensysClient {
            mean: Some(VensysMeanDataResponse {
                data: Some(VensysMeanData::new(321.0)),
            }),
            ..Default::default()
        };
        let (service, _, persistence) = service(client).await;

        assert!(service.log_energy_yield().await.unwrap());

        let today = Local::now().date_naive();
        let latest = persistence
            .generation_find_latest(Site::GraigFatha, day_start(today), day_end(today))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.value, 321.0);
    }

    #[tokio::test]
    async fn test_client_failure_propagates() {
        let client = FakeVensysClient {
            fail: true,
            ..Default::default()
        };
        let (service, _, _) = service(client).await;

        let err = service.get_yesterday_performance().await.unwrap_err();
        assert!(err.downcast_ref::<energycoop_common::EnergyCoopError>().is_some());
    }
}
