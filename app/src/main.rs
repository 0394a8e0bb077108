// app/src/main.rs

use mealsaver_app::config::{AppConfig, StorageBackend};
use mealsaver_app::services::seed;
use mealsaver_app::services::store::{Gateway, MemoryStore, PgStore};
use mealsaver_app::state::AppState;
use mealsaver_app::web::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

fn build_gateway(config: &AppConfig) -> std::io::Result<Gateway> {
  match config.storage_backend {
    StorageBackend::Memory => Ok(Gateway::new(Arc::new(MemoryStore::new()))),
    StorageBackend::Postgres => {
      let database_url = config.database_url.clone().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "DATABASE_URL is not set")
      })?;
      Ok(Gateway::new(Arc::new(PgStore::new(
        database_url,
        config.database_max_connections,
        config.database_connect_timeout,
      ))))
    }
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting MealSaver server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let gateway = build_gateway(&app_config)?;

  // The server still starts when the store is down; requests retry the
  // connection and fail with 503 until it comes back.
  match gateway.connect().await {
    Ok(()) => tracing::info!(store = gateway.backend_name(), "Store connection established."),
    Err(e) => tracing::warn!(error = %e, store = gateway.backend_name(), "Store unreachable at startup."),
  }

  if app_config.seed_db {
    if let Err(e) = seed::seed_demo_meals(&gateway).await {
      tracing::error!(error = %e, "Failed to seed demo meals.");
    }
  }

  let app_state = AppState::new(app_config.clone(), gateway);

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
