//! Graig Fatha membership endpoints

use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use energycoop_auth::authority;
use energycoop_common::Site;

use crate::{
    error::AppError,
    model::{app_state::AppState, constants::TAX_DOCUMENT_FILE_NAME},
    secured,
    service::member::EnergySaving,
};

use super::path_date;

/// This member's savings today
#[utoipa::path(
    get,
    path = "/api/v1/graigFatha/member/todaySavings",
    tag = "Graig Fatha Membership",
    responses(
        (status = 200, description = "Savings so far today", body = EnergySaving),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing read:gf-stats"),
        (status = 500, description = "Token carries no Graig Fatha ownership")
    ),
    security(("bearer_auth" = []))
)]
#[get("/graigFatha/member/todaySavings")]
pub async fn today_savings(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let principal = secured!(&req, authority::READ_GF_STATS);

    let saving = data
        .member_service
        .get_today_savings(principal.ownership(Site::GraigFatha))
        .await?;

    Ok(HttpResponse::Ok().json(saving))
}

/// This member's savings per day between two dates
#[utoipa::path(
    get,
    path = "/api/v1/graigFatha/member/savings/{from}/{to}",
    tag = "Graig Fatha Membership",
    params(
        ("from" = String, Path, description = "First day, yyyy-MM-dd"),
        ("to" = String, Path, description = "Last day, yyyy-MM-dd")
    ),
    responses(
        (status = 200, description = "Savings ordered by day", body = Vec<EnergySaving>),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing read:gf-stats")
    ),
    security(("bearer_auth" = []))
)]
#[get("/graigFatha/member/savings/{from}/{to}")]
pub async fn savings(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let principal = secured!(&req, authority::READ_GF_STATS);

    let (from, to) = path.into_inner();
    let from = path_date(&from)?;
    let to = path_date(&to)?;

    let savings = data
        .member_service
        .get_savings(
            from,
            to,
            principal.ownership(Site::GraigFatha),
            &principal.user_id,
        )
        .await?;

    Ok(HttpResponse::Ok().json(savings))
}

/// A PDF statement of this member's savings between two dates
#[utoipa::path(
    get,
    path = "/api/v1/graigFatha/member/tax-document/{from}/{to}",
    tag = "Graig Fatha Membership",
    params(
        ("from" = String, Path, description = "First day, yyyy-MM-dd"),
        ("to" = String, Path, description = "Last day, yyyy-MM-dd")
    ),
    responses(
        (status = 200, description = "application/pdf attachment named TaxDocument.pdf"),
        (status = 400, description = "Malformed date or from after to"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Missing read:tax-document")
    ),
    security(("bearer_auth" = []))
)]
#[get("/graigFatha/member/tax-document/{from}/{to}")]
pub async fn tax_document(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let principal = secured!(&req, authority::READ_TAX_DOCUMENT);

    let (from, to) = path.into_inner();
    let from = path_date(&from)?;
    let to = path_date(&to)?;

    let content = data
        .member_service
        .generate_tax_document(
            from,
            to,
            principal.ownership(Site::GraigFatha),
            &principal.user_id,
        )
        .await?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(
                TAX_DOCUMENT_FILE_NAME.to_string(),
            )],
        })
        .body(content))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(today_savings)
        .service(savings)
        .service(tax_document);
}
