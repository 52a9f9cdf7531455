//! Main entry point for the camping spot booking backend server.
//! This crate wires configuration, the database pool and the API routes into an HTTP server.

mod config;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, http::header, middleware::Logger, web};
use database::{Database, DatabaseConfig, QueryExecutor};
use web_handlers::{ImageStore, UPLOADS_PREFIX, configure_routes};

use crate::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting camping spot booking server...");

    let (server_config, database_config) =
        match (ServerConfig::from_env(), DatabaseConfig::from_env()) {
            (Ok(server), Ok(database)) => (server, database),
            (Err(e), _) | (_, Err(e)) => {
                log::error!("❌ Invalid configuration: {}", e);
                std::process::exit(1);
            }
        };

    // Create database connection pool
    let database = match Database::connect(&database_config).await {
        Ok(database) => {
            log::info!(
                "🗃️ Database pool created (max {} connections)",
                database_config.pool_size
            );

            if let Err(e) = database.test_connection().await {
                log::error!("❌ Database connection test failed: {}", e);
            }
            database
        }
        Err(e) => {
            log::error!("❌ Failed to create database pool: {}", e);
            log::error!("💡 Check the db_host, db_port, db_user, db_pass and db_name settings");
            std::process::exit(1);
        }
    };

    let image_store = ImageStore::new(&server_config.upload_dir);
    image_store.ensure_directory().await?;
    log::info!(
        "📁 Uploaded images stored in {}",
        image_store.directory().display()
    );

    let executor: web::Data<dyn QueryExecutor> =
        web::Data::from(Arc::new(database.clone()) as Arc<dyn QueryExecutor>);
    let images = web::Data::new(image_store);
    let cors_origin = server_config.cors_origin.clone();
    let upload_dir = server_config.upload_dir.clone();

    log::info!(
        "🌐 Server will be available at: http://{}",
        server_config.socket_addr()
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION]);

        App::new()
            .app_data(executor.clone())
            .app_data(images.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(Files::new(UPLOADS_PREFIX, &upload_dir))
            .configure(configure_routes)
    })
    .bind(server_config.socket_addr())?
    .run()
    .await?;

    database.close().await;
    log::info!("👋 Server stopped");

    Ok(())
}
