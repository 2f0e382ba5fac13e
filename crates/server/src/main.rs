mod auth;
mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use crate::{config::AppConfig, doc::ApiDoc, routes::health::health, state::AppState};
use axum::{Router, routing::get};
use database::{db::create_connection, services::notify::DbNotifier};
use log::info;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");

    if config.auto_migrate {
        Migrator::up(&db, None)
            .await
            .expect("Failed to apply migrations");
        info!("Migrations applied");
    }

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let protected = routes::router()
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()));

    let bind_addr = config.bind_addr;
    let state = AppState {
        notifier: Arc::new(DbNotifier::new(db.clone())),
        db,
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/health", get(health))
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown::shutdown_signal())
        .await
        .expect("Server error");
}
