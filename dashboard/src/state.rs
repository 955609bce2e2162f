// dashboard/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::image_storage::ImageStorage;
use crate::store::Store;
use crate::views::Views;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub orka_instance: Arc<orka::Orka<AppError>>,
  pub config: Arc<AppConfig>,
  pub views: Arc<Views>,
  pub images: Arc<ImageStorage>,
}
