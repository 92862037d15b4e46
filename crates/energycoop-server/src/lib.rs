//! Energy Co-op Server
//!
//! Configuration, services, scheduled jobs and the HTTP API.

pub mod api;
pub mod error;
pub mod middleware;
pub mod model;
pub mod scheduler;
pub mod secured;
pub mod service;
pub mod startup;

pub use error::AppError;
pub use model::app_state::AppState;
pub use model::config::Configuration;
