// dashboard/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use backoffice_dashboard::config::AppConfig;
use backoffice_dashboard::services::image_storage::ImageStorage;
use backoffice_dashboard::store::{PgStore, Store};
use backoffice_dashboard::{build_app_state, web};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting back-office server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let pg_store = PgStore::connect(&app_config)
    .await
    .map_err(|e| std::io::Error::other(e.to_string()))?;
  if app_config.run_migrations {
    if let Err(e) = pg_store.migrate().await {
      tracing::error!(error = %e, "Failed to apply database migrations.");
      return Err(std::io::Error::other(e.to_string()));
    }
  }
  if let Err(e) = pg_store.ping().await {
    tracing::error!(error = %e, "Database did not answer the startup ping.");
    return Err(std::io::Error::other(e.to_string()));
  }
  tracing::info!("Successfully connected to the database.");

  let store: Arc<dyn Store> = Arc::new(pg_store);
  let app_state = build_app_state(store.clone(), app_config.clone()).map_err(|e| {
    tracing::error!(error = %e, "Failed to build application state.");
    std::io::Error::other(e.to_string())
  })?;
  tracing::info!("Orka pipelines registered.");

  tokio::fs::create_dir_all(&app_config.upload_dir).await?;
  let images_dir = app_config.public_dir.join(ImageStorage::SERVED_SUBDIR);
  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let result = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
      .service(actix_files::Files::new(
        &format!("/{}", ImageStorage::SERVED_SUBDIR),
        images_dir.clone(),
      ))
  })
  .bind(&server_address)?
  .run()
  .await;

  store.close().await;
  result
}
