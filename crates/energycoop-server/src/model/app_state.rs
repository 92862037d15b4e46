//! Application state management
//!
//! This module defines the central application state shared across all handlers.

use std::sync::Arc;

use energycoop_auth::TokenVerifier;
use energycoop_client::VensysClient;
use energycoop_persistence::PersistenceService;

use crate::service::{
    alert::AlertService, info::InfoService, member::GraigFathaMemberService,
    savings_rate::SavingsRateService, stats::GraigFathaStatsService,
};

use super::config::Configuration;

/// Application state shared across all handlers
pub struct AppState {
    pub configuration: Configuration,
    pub persistence: Arc<dyn PersistenceService>,
    /// `None` when security is disabled
    pub token_verifier: Option<Arc<TokenVerifier>>,
    pub alert_service: Arc<AlertService>,
    pub stats_service: Arc<GraigFathaStatsService>,
    pub savings_rate_service: Arc<SavingsRateService>,
    pub member_service: Arc<GraigFathaMemberService>,
    pub info_service: InfoService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("persistence", &"<dyn PersistenceService>")
            .field("token_verifier", &self.token_verifier.is_some())
            .finish()
    }
}

impl AppState {
    /// Wire the services together from configuration
    pub fn build(
        configuration: Configuration,
        persistence: Arc<dyn PersistenceService>,
        vensys: Arc<dyn VensysClient>,
    ) -> anyhow::Result<Self> {
        let token_verifier = if configuration.security_enabled() {
            Some(Arc::new(TokenVerifier::new(configuration.jwt_settings())?))
        } else {
            tracing::warn!("Security is disabled, all requests run as the anonymous principal");
            None
        };

        let alert_service = Arc::new(AlertService::new(
            persistence.clone(),
            configuration.alerts_webhook_url(),
            configuration.alerts_latest_limit(),
        ));
        let stats_service = Arc::new(GraigFathaStatsService::new(
            vensys,
            persistence.clone(),
            alert_service.clone(),
            configuration.alert_thresholds(),
        ));
        let savings_rate_service = Arc::new(SavingsRateService::new(persistence.clone()));
        let member_service = Arc::new(GraigFathaMemberService::new(
            stats_service.clone(),
            savings_rate_service.clone(),
            persistence.clone(),
            configuration.graig_fatha_capacity_watts(),
            configuration.savings_currency(),
        ));

        Ok(Self {
            configuration,
            persistence,
            token_verifier,
            alert_service,
            stats_service,
            savings_rate_service,
            member_service,
            info_service: InfoService,
        })
    }

    pub fn security_enabled(&self) -> bool {
        self.token_verifier.is_some()
    }
}
