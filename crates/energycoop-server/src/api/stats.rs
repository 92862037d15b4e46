//! Graig Fatha turbine statistics endpoints

use actix_web::{HttpRequest, HttpResponse, get, web};
use energycoop_auth::authority;
use energycoop_client::{VensysMeanData, VensysPerformanceData};

use crate::{error::AppError, model::app_state::AppState, secured};

use super::path_date;

/// Today's mean energy yield
#[utoipa::path(
    get,
    path = "/api/v1/graigFatha/stats/energyYield",
    tag = "Graig Fatha Stats",
    responses(
        (status = 200, description = "Mean energy yield, zero when unavailable", body = VensysMeanData),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing read:gf-api")
    ),
    security(("bearer_auth" = []))
)]
#[get("/graigFatha/stats/energyYield")]
pub async fn energy_yield(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    secured!(&req, authority::READ_GF_API);

    let mean = data
        .stats_service
        .get_mean_energy_yield()
        .await?
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(mean))
}

/// Yesterday's performance summary
#[utoipa::path(
    get,
    path = "/api/v1/graigFatha/stats/yesterdayPerformance",
    tag = "Graig Fatha Stats",
    responses(
        (status = 200, description = "Performance summary for yesterday", body = VensysPerformanceData),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing read:gf-api")
    ),
    security(("bearer_auth" = []))
)]
#[get("/graigFatha/stats/yesterdayPerformance")]
pub async fn yesterday_performance(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    secured!(&req, authority::READ_GF_API);

    let performance = data.stats_service.get_yesterday_performance().await?;

    Ok(HttpResponse::Ok().json(performance))
}

/// Fetch and store the daily performance for every day in a range
#[utoipa::path(
    get,
    path = "/api/v1/graigFatha/stats/logPerformance/{from}/{to}",
    tag = "Graig Fatha Stats",
    params(
        ("from" = String, Path, description = "First day, yyyy-MM-dd"),
        ("to" = String, Path, description = "Last day, yyyy-MM-dd")
    ),
    responses(
        (status = 200, description = "Performance logged"),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing read:gf-stats-advanced")
    ),
    security(("bearer_auth" = []))
)]
#[get("/graigFatha/stats/logPerformance/{from}/{to}")]
pub async fn log_performance(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    secured!(&req, authority::READ_GF_STATS_ADVANCED);

    let (from, to) = path.into_inner();
    let from = path_date(&from)?;
    let to = path_date(&to)?;

    data.stats_service.log_performance(from, to).await?;

    Ok(HttpResponse::Ok().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(energy_yield)
        .service(yesterday_performance)
        .service(log_performance);
}
