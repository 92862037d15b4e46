// Error path middleware for Actix-web
// Re-renders handler errors so the ErrorResult body names the request path

use actix_utils::future::{Ready, ok};
use actix_web::{
    Error,
    body::{EitherBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};
use futures::future::LocalBoxFuture;

use crate::error::AppError;

pub struct ErrorPath;

impl<S, B> Transform<S, ServiceRequest> for ErrorPath
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorPathMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ErrorPathMiddleware { service })
    }
}

pub struct ErrorPathMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorPathMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        Box::pin(async move { Ok(with_request_path(fut.await?)) })
    }
}

/// Responses built from an `AppError` are rebuilt with the request path,
/// everything else passes through untouched
fn with_request_path<B>(res: ServiceResponse<B>) -> ServiceResponse<EitherBody<B>> {
    let rebuilt = res
        .response()
        .error()
        .and_then(|err| err.as_error::<AppError>())
        .map(|err| err.error_result(res.request().path()));

    match rebuilt {
        Some(response) => res.into_response(response).map_into_right_body(),
        None => res.map_into_left_body(),
    }
}
