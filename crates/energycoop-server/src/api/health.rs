use actix_web::{HttpResponse, Responder, get, web};

use crate::model::app_state::AppState;

use super::model::HealthStatus;

/// Storage health, no token required
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Storage reachable", body = HealthStatus),
        (status = 503, description = "Storage unreachable", body = HealthStatus)
    )
)]
#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> impl Responder {
    match data.persistence.health_check().await {
        Ok(()) => HttpResponse::Ok().json(HealthStatus::up()),
        Err(e) => {
            tracing::warn!("Health check failed: {:#}", e);
            HttpResponse::ServiceUnavailable().json(HealthStatus::down())
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
