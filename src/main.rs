use actix_web::{middleware, web, App, HttpServer};

use drivelog_api::auth::password::PasswordHasher;
use drivelog_api::auth::token::TokenService;
use drivelog_api::config::AppConfig;
use drivelog_api::db::{LogStore, UserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    let addr = format!("0.0.0.0:{}", config.port);
    log::info!("Listening on: {}", addr);

    let tokens = web::Data::new(TokenService::new(
        &config.signing_secret,
        config.token_ttl_secs,
    ));
    let hasher = web::Data::new(PasswordHasher::new(&config.pepper));
    let users = web::Data::new(UserStore::default());
    let logs = web::Data::new(LogStore::default());

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(tokens.clone())
            .app_data(hasher.clone())
            .app_data(users.clone())
            .app_data(logs.clone())
            .configure(drivelog_api::routes)
    })
    .bind(addr)?
    .run()
    .await
}
