//! Administration endpoints

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use energycoop_auth::authority;
use energycoop_persistence::{Alert, SavingsRate};

use crate::{error::AppError, model::app_state::AppState, secured};

use super::{model::SavingsRateRequest, path_site};

/// Set the savings rate for a site from a date onwards
#[utoipa::path(
    post,
    path = "/api/v1/admin/savings-rate",
    tag = "Admin",
    request_body = SavingsRateRequest,
    responses(
        (status = 200, description = "The stored rate", body = SavingsRate),
        (status = 400, description = "Unknown site, malformed date or invalid rate"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing set:savings-rate")
    ),
    security(("bearer_auth" = []))
)]
#[post("/admin/savings-rate")]
pub async fn set_savings_rate(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: Result<web::Json<SavingsRateRequest>, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    let principal = secured!(&req, authority::SET_SAVINGS_RATE);

    // Body errors are only reported to callers that passed the auth check
    let request = match body {
        Ok(body) => body.into_inner(),
        Err(err) => return Ok(err.error_response()),
    };
    let rate = data
        .savings_rate_service
        .set_savings_rate_for_date(
            request.site,
            request.effective_date,
            request.rate_per_kwh,
            &principal.user_id,
        )
        .await?;

    Ok(HttpResponse::Ok().json(rate))
}

/// Every savings rate set for a site
#[utoipa::path(
    get,
    path = "/api/v1/admin/savings-rate/{site}",
    tag = "Admin",
    params(("site" = String, Path, description = "GRAIG_FATHA, KIRK_HILL or DERRIL_WATER")),
    responses(
        (status = 200, description = "Rates, oldest effective date first", body = Vec<SavingsRate>),
        (status = 400, description = "Unknown site"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing set:savings-rate")
    ),
    security(("bearer_auth" = []))
)]
#[get("/admin/savings-rate/{site}")]
pub async fn get_savings_rates(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    secured!(&req, authority::SET_SAVINGS_RATE);

    let site = path_site(&path)?;
    let rates = data.savings_rate_service.get_rates(site).await?;

    Ok(HttpResponse::Ok().json(rates))
}

/// Latest alerts for a site, newest first
#[utoipa::path(
    get,
    path = "/api/v1/admin/alerts/{site}",
    tag = "Admin",
    params(("site" = String, Path, description = "GRAIG_FATHA, KIRK_HILL or DERRIL_WATER")),
    responses(
        (status = 200, description = "Latest alerts", body = Vec<Alert>),
        (status = 400, description = "Unknown site"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing read:alerts")
    ),
    security(("bearer_auth" = []))
)]
#[get("/admin/alerts/{site}")]
pub async fn latest_alerts(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    secured!(&req, authority::READ_ALERTS);

    let site = path_site(&path)?;
    let alerts = data.alert_service.get_latest_alerts(site).await?;

    Ok(HttpResponse::Ok().json(alerts))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(set_savings_rate)
        .service(get_savings_rates)
        .service(latest_alerts);
}
