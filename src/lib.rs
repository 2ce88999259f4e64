pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod log_handlers;
pub mod models;
pub mod response;
pub mod user_handlers;

use actix_web::{get, web, HttpResponse, Responder};
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::error::ApiError;
use crate::response::ApiResponse;

/// Simple health check
#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::data(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().timestamp(),
    })))
}

/// Full route table, shared by the binary and the integration tests.
/// Everything under `/api` except `/api/auth` sits behind the bearer
/// middleware.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(err.to_string()).into()
    }))
    .service(health)
    .service(
        web::scope("/api/auth")
            .service(user_handlers::register)
            .service(user_handlers::login)
            .service(user_handlers::verify),
    )
    .service(
        web::scope("/api")
            .wrap(HttpAuthentication::bearer(auth::validator))
            .service(user_handlers::change_password)
            .service(user_handlers::get_user)
            .service(user_handlers::update_user)
            .service(user_handlers::delete_user)
            .service(log_handlers::list_logs)
            .service(log_handlers::create_log)
            .service(log_handlers::get_log)
            .service(log_handlers::update_log)
            .service(log_handlers::delete_log),
    );
}
