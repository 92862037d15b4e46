//! Configuration management for the energy co-op server
//!
//! This module handles loading and accessing application configuration.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment};
use energycoop_auth::{DEFAULT_OWNERSHIPS_CLAIM, JwtSettings};
use energycoop_client::VensysClientConfig;
use energycoop_common::DEFAULT_CURRENCY;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::service::stats::AlertThresholds;
use crate::startup::LoggingConfig;

use super::constants::{
    DEFAULT_AVAILABILITY_THRESHOLD, DEFAULT_ENERGY_YIELD_CRON, DEFAULT_FAILURE_TIME_THRESHOLD,
    DEFAULT_GRAIG_FATHA_CAPACITY_WATTS, DEFAULT_LATEST_ALERTS_LIMIT, DEFAULT_PERFORMANCE_CRON,
    DEFAULT_SERVER_PORT, DEV_PROFILE,
};

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command()]
struct Cli {
    /// Active profile, `dev` disables the scheduler
    #[arg(short = 'p', long = "profile", env = "ENERGYCOOP_PROFILE")]
    profile: Option<String>,
    #[arg(long = "port")]
    port: Option<u16>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(short = 'c', long = "config", default_value = "conf/application.yml")]
    config_file: String,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> anyhow::Result<Self> {
        let args = Cli::parse();

        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&args.config_file))
            .add_source(
                Environment::with_prefix("energycoop")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.profile {
            config_builder = config_builder.set_override("profile", v)?;
        }
        if let Some(v) = args.port {
            config_builder = config_builder.set_override("server.port", v)?;
        }
        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override("db.url", v)?;
        }

        Ok(Self::from_config(config_builder.build()?))
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    /// A string value, treating an empty string as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.config
            .get_string(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn profile(&self) -> String {
        self.config
            .get_string("profile")
            .unwrap_or("default".to_string())
    }

    pub fn is_dev_profile(&self) -> bool {
        self.profile() == DEV_PROFILE
    }

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .unwrap_or(DEFAULT_SERVER_PORT.into()) as u16
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn db_auto_migrate(&self) -> bool {
        self.config.get_bool("db.auto-migrate").unwrap_or(true)
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let max_connections = self
            .config
            .get_int("db.pool.max-connections")
            .unwrap_or(20) as u32;
        let min_connections = self
            .config
            .get_int("db.pool.min-connections")
            .unwrap_or(1) as u32;
        let connect_timeout = self
            .config
            .get_int("db.pool.connect-timeout-secs")
            .unwrap_or(30) as u64;
        let acquire_timeout = self
            .config
            .get_int("db.pool.acquire-timeout-secs")
            .unwrap_or(8) as u64;
        let idle_timeout = self
            .config
            .get_int("db.pool.idle-timeout-secs")
            .unwrap_or(600) as u64;
        let max_lifetime = self
            .config
            .get_int("db.pool.max-lifetime-secs")
            .unwrap_or(1800) as u64;
        let sqlx_logging = self
            .config
            .get_bool("db.pool.sqlx-logging")
            .unwrap_or(false);

        let url = self.config.get_string("db.url")?;

        let mut opt = ConnectOptions::new(url);

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        Ok(Database::connect(opt).await?)
    }

    // ========================================================================
    // Vensys Configuration
    // ========================================================================

    pub fn vensys_client_config(&self) -> VensysClientConfig {
        let defaults = VensysClientConfig::default();

        let base_url = self
            .get_non_empty("vensys.graig-fatha.base-url")
            .unwrap_or(defaults.base_url);
        let api_key = self
            .get_non_empty("vensys.graig-fatha.api-key")
            .unwrap_or_default();
        let connect_timeout_ms = self
            .config
            .get_int("vensys.graig-fatha.connect-timeout-ms")
            .map(|v| v as u64)
            .unwrap_or(defaults.connect_timeout_ms);
        let read_timeout_ms = self
            .config
            .get_int("vensys.graig-fatha.read-timeout-ms")
            .map(|v| v as u64)
            .unwrap_or(defaults.read_timeout_ms);

        VensysClientConfig::new(&base_url)
            .with_api_key(&api_key)
            .with_timeouts(connect_timeout_ms, read_timeout_ms)
    }

    // ========================================================================
    // Alert Configuration
    // ========================================================================

    pub fn alert_thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            availability: self
                .config
                .get_float("alerts.thresholds.availability")
                .unwrap_or(DEFAULT_AVAILABILITY_THRESHOLD),
            failure_time: self
                .config
                .get_float("alerts.thresholds.failure-time")
                .unwrap_or(DEFAULT_FAILURE_TIME_THRESHOLD),
        }
    }

    pub fn alerts_latest_limit(&self) -> u64 {
        self.config
            .get_int("alerts.latest-limit")
            .ok()
            .filter(|v| *v > 0)
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_LATEST_ALERTS_LIMIT)
    }

    pub fn alerts_webhook_url(&self) -> Option<String> {
        self.get_non_empty("alerts.webhook-url")
    }

    // ========================================================================
    // Scheduling Configuration
    // ========================================================================

    /// Off for the `dev` profile regardless of `scheduling.enabled`
    pub fn scheduling_enabled(&self) -> bool {
        !self.is_dev_profile() && self.config.get_bool("scheduling.enabled").unwrap_or(true)
    }

    pub fn energy_yield_cron(&self) -> String {
        self.get_non_empty("scheduling.graig-fatha.schedule.energy-yield")
            .unwrap_or(DEFAULT_ENERGY_YIELD_CRON.to_string())
    }

    pub fn performance_cron(&self) -> String {
        self.get_non_empty("scheduling.graig-fatha.schedule.performance")
            .unwrap_or(DEFAULT_PERFORMANCE_CRON.to_string())
    }

    // ========================================================================
    // Security Configuration
    // ========================================================================

    pub fn security_enabled(&self) -> bool {
        self.config.get_bool("security.enabled").unwrap_or(true)
    }

    pub fn jwt_settings(&self) -> JwtSettings {
        let defaults = JwtSettings::default();

        JwtSettings {
            secret: self.get_non_empty("security.jwt.secret"),
            public_key_pem: self.get_non_empty("security.jwt.public-key-pem"),
            jwks_url: self.get_non_empty("security.jwt.jwks-url"),
            issuer: self.get_non_empty("security.jwt.issuer"),
            audience: self.get_non_empty("security.jwt.audience"),
            ownerships_claim: self
                .get_non_empty("security.jwt.ownerships-claim")
                .unwrap_or(DEFAULT_OWNERSHIPS_CLAIM.to_string()),
            cache_ttl_secs: self
                .config
                .get_int("security.jwt.cache-ttl-secs")
                .map(|v| v.max(1) as u64)
                .unwrap_or(defaults.cache_ttl_secs),
            jwks_ttl_secs: defaults.jwks_ttl_secs,
        }
    }

    // ========================================================================
    // Member Configuration
    // ========================================================================

    pub fn graig_fatha_capacity_watts(&self) -> f64 {
        self.config
            .get_float("sites.graig-fatha.capacity-watts")
            .ok()
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_GRAIG_FATHA_CAPACITY_WATTS)
    }

    pub fn savings_currency(&self) -> String {
        self.get_non_empty("savings.currency")
            .unwrap_or(DEFAULT_CURRENCY.to_string())
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.get_non_empty("logging.dir"),
            self.config.get_bool("logging.console").unwrap_or(true),
            self.config.get_bool("logging.file").unwrap_or(true),
            self.config
                .get_string("logging.level")
                .unwrap_or("info".to_string()),
        )
    }
}
