pub mod password;
pub mod token;

use std::future::{ready, Ready};

use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::error::ApiError;
use token::{Claims, TokenService};

/// Pull the token out of an `Authorization: Bearer <token>` header.
/// The scheme keyword is case-sensitive with a single space separator.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Request validator for `HttpAuthentication::bearer`. On success the
/// claims land in the request extensions for handlers to extract.
pub async fn validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let claims = req
        .app_data::<web::Data<TokenService>>()
        .and_then(|tokens| tokens.validate(credentials.token()));

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        None => Err((
            ApiError::Unauthorized("Invalid or expired token".into()).into(),
            req,
        )),
    }
}

impl FromRequest for Claims {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Claims>()
                .cloned()
                .ok_or_else(|| {
                    ApiError::Unauthorized("Authentication required".into()).into()
                }),
        )
    }
}
