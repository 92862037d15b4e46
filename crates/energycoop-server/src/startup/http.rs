//! HTTP server setup

use std::sync::Arc;

use actix_web::{
    App, HttpServer, dev::Server, error::InternalError, http::StatusCode, middleware::Logger, web,
};

use crate::{
    api,
    middleware::{auth::Authentication, error_path::ErrorPath},
    model::{app_state::AppState, constants::API_PREFIX, response::ErrorResult},
};

/// Register the API routes, the JSON body error handler and the error path
/// rewriting for handler errors
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| {
        let response =
            ErrorResult::http_response(StatusCode::BAD_REQUEST, &err.to_string(), req.path());
        InternalError::from_response(err, response).into()
    }))
    .service(
        web::scope(API_PREFIX)
            .wrap(ErrorPath)
            .configure(api::health::configure)
            .configure(api::stats::configure)
            .configure(api::member::configure)
            .configure(api::admin::configure)
            .configure(api::info::configure),
    )
    .configure(api::openapi::configure_swagger);
}

/// Creates and binds the main HTTP server.
///
/// Signal handling is left to the caller, which stops the server through
/// the returned handle.
pub fn main_server(
    app_state: Arc<AppState>,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Authentication)
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .configure(configure)
    })
    .disable_signals()
    .bind((address, port))?
    .run())
}
