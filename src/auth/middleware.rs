use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::Claims;

/// Bearer-token gate for protected scopes.
///
/// Verifies the `Authorization` header and stashes the decoded claims in
/// the request extensions for the `AuthUser` extractor. Failures are
/// answered here as materialized responses, not surfaced as service
/// errors. Role checks are left to the handlers, which know which roles
/// they admit.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    match authenticate(&req) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.call(req).await
        }
        Err(err) => Ok(req.into_response(err.error_response())),
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, ApiError> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| ApiError::internal("App config missing"))?;

    let header_value = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ApiError::unauthenticated("Missing Authorization header"))?
        .to_str()
        .map_err(|_| ApiError::unauthenticated("Invalid Authorization header encoding"))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthenticated("Authorization header must start with Bearer"))?;

    verify_token(token, &config.jwt_secret)
        .map_err(|_| ApiError::unauthenticated("Invalid or expired token"))
}
