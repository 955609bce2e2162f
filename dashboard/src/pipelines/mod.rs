// dashboard/src/pipelines/mod.rs

//! Defines and registers the Orka pipelines used by the back-office.

use crate::errors::AppError;
use crate::state::AppState;
use orka::Orka;
use std::sync::Arc;

pub mod contexts;
pub mod order_pipeline;

pub use order_pipeline::submit_order;

/// Registers every pipeline with `orka_instance`. Called once at startup.
pub fn register_all_pipelines(orka_instance: &Arc<Orka<AppError>>, app_state: &AppState) {
  tracing::info!("Registering Orka pipelines...");
  order_pipeline::register_add_order_pipeline(orka_instance, app_state);
  tracing::info!("All application pipelines registered with Orka.");
}
