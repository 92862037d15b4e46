// Authentication middleware for Actix-web
// Verifies bearer tokens and places an AuthContext in the request extensions

use std::rc::Rc;

use actix_service::forward_ready;
use actix_utils::future::{Ready, ok};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web::Data,
};
use energycoop_auth::{AUTHORIZATION_HEADER, AuthContext, Principal, TOKEN_PREFIX};
use futures::future::LocalBoxFuture;

use crate::model::app_state::AppState;

// Authentication middleware transformer
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: Rc<S>,
}

/// Token from an `Authorization: Bearer <token>` header
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let header_val = req.headers().get(AUTHORIZATION_HEADER)?;
    let token = header_val.to_str().ok()?.trim().strip_prefix(TOKEN_PREFIX)?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            if Method::OPTIONS != *req.method() {
                let auth_context = resolve_auth_context(&req).await;
                req.extensions_mut().insert(auth_context);
            }

            service.call(req).await
        })
    }
}

async fn resolve_auth_context(req: &ServiceRequest) -> AuthContext {
    let Some(app_state) = req.app_data::<Data<AppState>>() else {
        tracing::error!("AppState not found in request app_data");
        return AuthContext::default();
    };

    let Some(verifier) = app_state.token_verifier.clone() else {
        return AuthContext::authenticated(Principal::anonymous());
    };

    let Some(token) = extract_token(req) else {
        return AuthContext::default();
    };

    match verifier.authenticate(&token).await {
        Ok(principal) => {
            tracing::debug!(user_id = %principal.user_id, "Authenticated request");
            AuthContext::authenticated(principal)
        }
        Err(err) => {
            tracing::debug!(path = req.path(), "Rejected bearer token: {}", err);
            AuthContext {
                principal: None,
                jwt_error: Some(err),
                token_provided: true,
            }
        }
    }
}
