// VensysHttpClient - telemetry source for a single turbine site

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use energycoop_common::EnergyCoopError;

use crate::{
    config::VensysClientConfig,
    constants::{PARAM_FROM, PARAM_TO, vensys_api_path},
    error::VensysError,
    model::{VensysMeanDataResponse, VensysPerformanceDataResponse},
};

/// Telemetry operations the stats service depends on.
///
/// Each call yields `None` when the API has nothing to return (empty body,
/// 204 or 404), so callers can treat "no data" separately from failures.
#[async_trait]
pub trait VensysClient: Send + Sync {
    /// Mean energy yield for today so far
    async fn get_mean_energy_yield(&self) -> anyhow::Result<Option<VensysMeanDataResponse>>;

    /// Performance summary of the current day
    async fn get_current_performance(
        &self,
    ) -> anyhow::Result<Option<VensysPerformanceDataResponse>>;

    /// Performance summary between two epoch-second timestamps
    async fn get_performance(
        &self,
        from: i64,
        to: i64,
    ) -> anyhow::Result<Option<VensysPerformanceDataResponse>>;
}

/// reqwest-backed Vensys client
pub struct VensysHttpClient {
    client: Client,
    config: VensysClientConfig,
}

impl VensysHttpClient {
    pub fn new(config: VensysClientConfig) -> anyhow::Result<Self> {
        if reqwest::Url::parse(&config.base_url).is_err() {
            return Err(VensysError::InvalidBaseUrl(config.base_url.clone()).into());
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, VensysError> {
        let url = self.build_url(path);
        debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            debug!("{} returned {}, treating as no data", url, status);
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Vensys request {} failed with status {}", url, status);
            return Err(VensysError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: Option<T> = serde_json::from_slice(&body)?;
        Ok(value)
    }
}

fn upstream(err: VensysError) -> anyhow::Error {
    anyhow::Error::new(EnergyCoopError::NetworkError(err.to_string()))
}

#[async_trait]
impl VensysClient for VensysHttpClient {
    async fn get_mean_energy_yield(&self) -> anyhow::Result<Option<VensysMeanDataResponse>> {
        Ok(self
            .get_optional(vensys_api_path::MEAN_ENERGY_YIELD, &[])
            .await
            .map_err(upstream)?)
    }

    async fn get_current_performance(
        &self,
    ) -> anyhow::Result<Option<VensysPerformanceDataResponse>> {
        Ok(self
            .get_optional(vensys_api_path::CURRENT_PERFORMANCE, &[])
            .await
            .map_err(upstream)?)
    }

    async fn get_performance(
        &self,
        from: i64,
        to: i64,
    ) -> anyhow::Result<Option<VensysPerformanceDataResponse>> {
        Ok(self
            .get_optional(
                vensys_api_path::PERFORMANCE,
                &[(PARAM_FROM, from.to_string()), (PARAM_TO, to.to_string())],
            )
            .await
            .map_err(upstream)?)
    }
}
