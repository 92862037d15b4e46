//! Application-specific error types
//!
//! Library code attaches these variants to `anyhow::Error`; the HTTP layer
//! downcasts them to pick a response status.

use crate::site::Site;

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum EnergyCoopError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("authentication error: {0}")]
    AuthError(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error("no ownership of {0} found for principal")]
    MissingOwnership(Site),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EnergyCoopError::IllegalArgument("invalid rate".to_string());
        assert_eq!(format!("{}", err), "caused: invalid rate");

        let err = EnergyCoopError::NetworkError("connection timeout".to_string());
        assert_eq!(format!("{}", err), "network error: connection timeout");

        let err = EnergyCoopError::MissingOwnership(Site::GraigFatha);
        assert_eq!(
            format!("{}", err),
            "no ownership of GRAIG_FATHA found for principal"
        );
    }
}
