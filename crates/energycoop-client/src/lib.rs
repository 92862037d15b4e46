// energycoop-client: Vensys turbine telemetry HTTP client

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;

pub use client::{VensysClient, VensysHttpClient};
pub use config::VensysClientConfig;
pub use error::VensysError;
pub use model::{
    VensysMeanData, VensysMeanDataResponse, VensysPerformanceData, VensysPerformanceDataResponse,
};
