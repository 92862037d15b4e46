// Authorization checks for API handlers

use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use energycoop_auth::{AuthContext, Principal};

use crate::model::response::ErrorResult;

/// The request's principal, or the error response to return instead.
///
/// No token or a rejected token yields 401; a principal missing `authority`
/// yields 403.
pub fn authorize(req: &HttpRequest, authority: Option<&str>) -> Result<Principal, HttpResponse> {
    let auth_context: Option<AuthContext> = req.extensions().get::<AuthContext>().cloned();

    let principal = match auth_context {
        None => {
            return Err(ErrorResult::http_response_unauthorized(
                "no auth context found",
                req.path(),
            ));
        }
        Some(ref ctx) if ctx.jwt_error.is_some() => {
            return Err(ErrorResult::http_response_unauthorized(
                &ctx.jwt_error_string(),
                req.path(),
            ));
        }
        Some(AuthContext {
            principal: Some(principal),
            ..
        }) => principal,
        Some(_) => {
            return Err(ErrorResult::http_response_unauthorized(
                "no token provided",
                req.path(),
            ));
        }
    };

    if let Some(authority) = authority
        && !principal.has_authority(authority)
    {
        tracing::debug!(
            user_id = %principal.user_id,
            authority = authority,
            path = req.path(),
            "Missing authority"
        );
        return Err(ErrorResult::http_response_forbidden(
            "authorization failed!",
            req.path(),
        ));
    }

    Ok(principal)
}

/// Evaluates to the request's `Principal`, returning the 401/403 response
/// from the enclosing handler when authorization fails.
///
/// ```ignore
/// let principal = secured!(&req, authority::READ_GF_API);
/// let principal = secured!(&req); // any authenticated principal
/// ```
#[macro_export]
macro_rules! secured {
    ($req:expr) => {
        match $crate::secured::authorize($req, None) {
            Ok(principal) => principal,
            Err(response) => return Ok(response),
        }
    };
    ($req:expr, $authority:expr) => {
        match $crate::secured::authorize($req, Some($authority)) {
            Ok(principal) => principal,
            Err(response) => return Ok(response),
        }
    };
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use energycoop_auth::{VerifyError, authority};

    use super::*;

    fn request(ctx: Option<AuthContext>) -> HttpRequest {
        let req = TestRequest::default().uri("/api/v1/test").to_http_request();
        if let Some(ctx) = ctx {
            req.extensions_mut().insert(ctx);
        }
        req
    }

    #[test]
    fn test_missing_context_is_unauthorized() {
        let err = authorize(&request(None), None).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err = authorize(&request(Some(AuthContext::default())), None).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_jwt_error_is_unauthorized() {
        let ctx = AuthContext {
            principal: None,
            jwt_error: Some(VerifyError::Expired),
            token_provided: true,
        };
        let err = authorize(&request(Some(ctx)), Some(authority::READ_GF_API)).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authority_check() {
        let mut principal = Principal {
            user_id: "member".to_string(),
            ..Default::default()
        };
        principal.authorities.insert(authority::READ_GF_API.to_string());

        let req = request(Some(AuthContext::authenticated(principal)));
        assert!(authorize(&req, Some(authority::READ_GF_API)).is_ok());
        assert!(authorize(&req, None).is_ok());

        let err = authorize(&req, Some(authority::READ_ALERTS)).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
