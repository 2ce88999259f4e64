use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::response::ApiResponse;

/// API-level failures, rendered through the JSON envelope.
///
/// Routine authentication rejection never travels as an error value
/// inside the auth core (`verify` returns bool, `validate` returns
/// Option); only the HTTP boundary turns those into `Unauthorized`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::error(self.to_string()))
    }
}

impl From<crate::db::UserStoreError> for ApiError {
    fn from(err: crate::db::UserStoreError) -> Self {
        use crate::db::UserStoreError;
        match err {
            UserStoreError::UsernameTaken => {
                ApiError::BadRequest("Username already exists".into())
            }
            UserStoreError::EmailTaken => ApiError::BadRequest("Email already exists".into()),
            UserStoreError::NotFound => ApiError::NotFound("User not found".into()),
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        log::error!("password hashing failed: {err}");
        ApiError::Internal
    }
}
