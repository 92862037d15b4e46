//! Energy Co-op Common - Shared types and utilities
//!
//! This crate provides the foundational types used across the workspace:
//! - The domain error enum
//! - The `Site` enumeration
//! - Date and formatting helpers

pub mod error;
pub mod site;
pub mod utils;

// Re-exports for convenience
pub use error::EnergyCoopError;
pub use site::Site;
pub use utils::{day_end, day_start, days_between, format_decimal, parse_iso_date};

/// Default currency for member savings
pub const DEFAULT_CURRENCY: &str = "GBP";

/// Path date format (`yyyy-MM-dd`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";
