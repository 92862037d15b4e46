use actix_web::{HttpRequest, HttpResponse, get, web};
use energycoop_common::Site;

use crate::{error::AppError, model::app_state::AppState, secured};

/// All co-operative sites
#[utoipa::path(
    get,
    path = "/api/v1/info/sites",
    tag = "Info",
    responses(
        (status = 200, description = "Every site", body = Vec<Site>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
#[get("/info/sites")]
pub async fn sites(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    secured!(&req);

    Ok(HttpResponse::Ok().json(data.info_service.get_sites()))
}

/// Sites the caller owns a share of
#[utoipa::path(
    get,
    path = "/api/v1/info/sites-owned",
    tag = "Info",
    responses(
        (status = 200, description = "Owned sites", body = Vec<Site>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
#[get("/info/sites-owned")]
pub async fn sites_owned(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let principal = secured!(&req);

    Ok(HttpResponse::Ok().json(data.info_service.get_sites_with_user_ownership(&principal)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sites).service(sites_owned);
}
