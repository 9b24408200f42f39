mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::{MongoDB, MongoUserStore, UnavailableUserStore, UserStore, UserStoreData};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();

    log::info!("🚀 Starting User Service...");

    // A failed connection is logged and the server starts regardless
    let store: Arc<dyn UserStore> =
        match MongoDB::new(&config.database_url, config.database_name.as_deref()).await {
            Ok(db) => {
                log::info!("📊 Database: {}", db.name());
                match db.ping().await {
                    Ok(()) => log::info!("✅ Connected to DB"),
                    Err(e) => log::error!("❌ Error connecting to DB: {}", e),
                }
                Arc::new(MongoUserStore::new(db))
            }
            Err(e) => {
                log::error!("❌ Error connecting to DB: {}", e);
                Arc::new(UnavailableUserStore::new(e.to_string()))
            }
        };

    let store_data: UserStoreData = web::Data::from(store);
    let openapi = api::swagger::ApiDoc::openapi();

    log::info!("🌐 Server is running at {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/apidocs/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(store_data.clone())
            .wrap(Cors::permissive())
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/apidocs/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            .route("/health", web::get().to(api::health::health_check))
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            .configure(api::users::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
