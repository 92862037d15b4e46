//! Alert recording and notification

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use energycoop_common::Site;
use energycoop_persistence::{Alert, PersistenceService};
use serde::Serialize;
use tracing::{debug, warn};

/// Webhook payload for an alert
#[derive(Debug, Clone, Serialize)]
pub struct AlertNotification<'a> {
    pub site: Site,
    pub message: &'a str,
    pub timestamp: String,
}

/// Stores alerts and forwards them to an optional webhook.
pub struct AlertService {
    persistence: Arc<dyn PersistenceService>,
    client: reqwest::Client,
    webhook_url: Option<String>,
    latest_limit: u64,
}

impl AlertService {
    pub fn new(
        persistence: Arc<dyn PersistenceService>,
        webhook_url: Option<String>,
        latest_limit: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            persistence,
            client,
            webhook_url,
            latest_limit,
        }
    }

    pub async fn send_alert(&self, site: Site, message: &str) -> anyhow::Result<Alert> {
        warn!(site = %site, "Alert: {}", message);

        let alert = self
            .persistence
            .alert_save(site, message, Local::now().naive_local())
            .await?;

        if let Some(url) = &self.webhook_url {
            self.notify_webhook(url, &alert).await;
        }

        Ok(alert)
    }

    pub async fn get_latest_alerts(&self, site: Site) -> anyhow::Result<Vec<Alert>> {
        self.persistence
            .alert_find_latest(site, self.latest_limit)
            .await
    }

    async fn notify_webhook(&self, url: &str, alert: &Alert) {
        let payload = AlertNotification {
            site: alert.site,
            message: &alert.message,
            timestamp: alert.created_at.and_utc().to_rfc3339(),
        };

        match self.client.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(alert_id = alert.id, "Alert webhook delivered");
            }
            Ok(response) => {
                warn!(
                    alert_id = alert.id,
                    status = %response.status(),
                    "Alert webhook returned non-success status"
                );
            }
            Err(e) => {
                warn!(alert_id = alert.id, error = %e, "Failed to deliver alert webhook");
            }
        }
    }
}
