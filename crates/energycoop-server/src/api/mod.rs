//! HTTP API handlers, all mounted under `/api/v1`

pub mod admin;
pub mod health;
pub mod info;
pub mod member;
pub mod model;
pub mod openapi;
pub mod stats;

use chrono::NaiveDate;
use energycoop_common::{EnergyCoopError, Site, parse_iso_date};

/// Parse a `yyyy-MM-dd` path segment, failing with a 400
pub(crate) fn path_date(value: &str) -> Result<NaiveDate, EnergyCoopError> {
    parse_iso_date(value).map_err(EnergyCoopError::IllegalArgument)
}

/// Parse a site path segment, failing with a 400
pub(crate) fn path_site(value: &str) -> Result<Site, EnergyCoopError> {
    value.parse::<Site>().map_err(EnergyCoopError::IllegalArgument)
}
