// dashboard/src/lib.rs

//! Back-office dashboard for an online shop: product, customer, order and
//! vendor-contact management over a relational store, with order submission
//! run as an Orka pipeline.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod views;
pub mod web;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::services::image_storage::ImageStorage;
use crate::state::AppState;
use crate::store::Store;
use crate::views::Views;
use orka::Orka;
use std::sync::Arc;

/// Wires the shared state around `store` and registers every pipeline.
pub fn build_app_state(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Result<AppState> {
  let orka_instance = Arc::new(Orka::<AppError>::new());
  let app_state = AppState {
    store,
    orka_instance: orka_instance.clone(),
    views: Arc::new(Views::new()?),
    images: Arc::new(ImageStorage::from_config(&config)?),
    config,
  };
  pipelines::register_all_pipelines(&orka_instance, &app_state);
  Ok(app_state)
}
