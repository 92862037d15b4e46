//! OpenAPI documentation for the energy co-op API

use energycoop_client::{VensysMeanData, VensysPerformanceData};
use energycoop_common::Site;
use energycoop_persistence::{Alert, SavingsRate};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::model::response::ErrorResult;
use crate::service::member::EnergySaving;

use super::model::{HealthStatus, SavingsRateRequest};

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Energy Co-op API",
        description = "Wind turbine statistics and member savings for the energy co-operative"
    ),
    tags(
        (name = "Graig Fatha Stats", description = "Turbine statistics for the Graig Fatha wind farm"),
        (name = "Graig Fatha Membership", description = "Membership endpoints for the Graig Fatha wind farm"),
        (name = "Admin", description = "Savings rates and alerts"),
        (name = "Info", description = "Site information"),
        (name = "Health", description = "Health check")
    ),
    paths(
        crate::api::stats::energy_yield,
        crate::api::stats::yesterday_performance,
        crate::api::stats::log_performance,
        crate::api::member::today_savings,
        crate::api::member::savings,
        crate::api::member::tax_document,
        crate::api::admin::set_savings_rate,
        crate::api::admin::get_savings_rates,
        crate::api::admin::latest_alerts,
        crate::api::info::sites,
        crate::api::info::sites_owned,
        crate::api::health::health,
    ),
    components(
        schemas(
            VensysMeanData,
            VensysPerformanceData,
            EnergySaving,
            SavingsRate,
            SavingsRateRequest,
            Alert,
            Site,
            HealthStatus,
            ErrorResult,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Configure Swagger UI for the actix-web app
#[cfg(feature = "swagger")]
pub fn configure_swagger(cfg: &mut actix_web::web::ServiceConfig) {
    use utoipa_swagger_ui::SwaggerUi;

    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}

/// Configure Swagger UI for the actix-web app (no-op when swagger feature is disabled)
#[cfg(not(feature = "swagger"))]
pub fn configure_swagger(_cfg: &mut actix_web::web::ServiceConfig) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert_eq!(paths.len(), 12);
        assert!(
            doc.paths
                .paths
                .contains_key("/api/v1/graigFatha/member/tax-document/{from}/{to}")
        );
        assert!(doc.paths.paths.contains_key("/api/v1/health"));

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("EnergySaving"));
    }
}
