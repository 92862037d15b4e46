// Error handling for HTTP handlers
// Wraps anyhow errors so they can be returned from actix-web handlers

use std::fmt::{Display, Formatter};

use actix_web::{HttpResponse, http::StatusCode};

pub use energycoop_common::EnergyCoopError;

use crate::model::response::ErrorResult;

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<EnergyCoopError> for AppError {
    fn from(value: EnergyCoopError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// The `ErrorResult` body for this error, reported against `path`
    pub fn error_result(&self, path: &str) -> HttpResponse {
        use actix_web::ResponseError;

        ErrorResult::http_response(self.status_code(), &self.inner.to_string(), path)
    }
}

impl actix_web::error::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.downcast_ref::<EnergyCoopError>() {
            Some(EnergyCoopError::IllegalArgument(_)) => StatusCode::BAD_REQUEST,
            Some(EnergyCoopError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(EnergyCoopError::AuthError(_)) => StatusCode::UNAUTHORIZED,
            Some(EnergyCoopError::AccessDenied(_)) => StatusCode::FORBIDDEN,
            Some(EnergyCoopError::NetworkError(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Some(EnergyCoopError::DatabaseError(_))
            | Some(EnergyCoopError::ConfigError(_))
            | Some(EnergyCoopError::InternalError(_))
            | Some(EnergyCoopError::MissingOwnership(_))
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // The path is filled in by `middleware::error_path` once the request is known
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.inner);
        }
        self.error_result("")
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use energycoop_common::Site;

    use super::*;

    #[test]
    fn test_app_error_from_anyhow() {
        let app_err = AppError::from(anyhow::anyhow!("test error"));
        assert_eq!(format!("{}", app_err), "test error");
        assert_eq!(app_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (EnergyCoopError::IllegalArgument("x".into()), 400),
            (EnergyCoopError::NotFound("x".into()), 404),
            (EnergyCoopError::AuthError("x".into()), 401),
            (EnergyCoopError::AccessDenied("x".into()), 403),
            (EnergyCoopError::NetworkError("x".into()), 503),
            (EnergyCoopError::DatabaseError("x".into()), 500),
            (EnergyCoopError::ConfigError("x".into()), 500),
            (EnergyCoopError::MissingOwnership(Site::GraigFatha), 500),
        ];

        for (err, status) in cases {
            let app_err = AppError::from(err);
            assert_eq!(app_err.status_code().as_u16(), status);
            assert_eq!(app_err.error_response().status().as_u16(), status);
        }
    }

    #[test]
    fn test_context_keeps_classification() {
        let err = anyhow::Error::from(EnergyCoopError::IllegalArgument("bad rate".into()))
            .context("setting rate");
        let app_err = AppError::from(err);
        assert!(app_err.downcast_ref::<EnergyCoopError>().is_some());
        assert_eq!(app_err.status_code(), StatusCode::BAD_REQUEST);
    }
}
