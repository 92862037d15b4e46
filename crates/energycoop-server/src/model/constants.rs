// Server defaults used when configuration keys are absent

pub const DEFAULT_SERVER_PORT: u16 = 8080;

pub const DEV_PROFILE: &str = "dev";

pub const DEFAULT_AVAILABILITY_THRESHOLD: f64 = 75.0;
pub const DEFAULT_FAILURE_TIME_THRESHOLD: f64 = 100.0;
pub const DEFAULT_LATEST_ALERTS_LIMIT: u64 = 10;

/// Six-field cron expressions, seconds first
pub const DEFAULT_ENERGY_YIELD_CRON: &str = "15 */15 * * * *";
pub const DEFAULT_PERFORMANCE_CRON: &str = "5 0 */6 * * *";

pub const DEFAULT_GRAIG_FATHA_CAPACITY_WATTS: f64 = 500_000.0;

pub const API_PREFIX: &str = "/api/v1";

pub const TAX_DOCUMENT_FILE_NAME: &str = "TaxDocument.pdf";
