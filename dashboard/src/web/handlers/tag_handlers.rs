// dashboard/src/web/handlers/tag_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::TagStore;

#[instrument(name = "handler::list_tags", skip(app_state))]
pub async fn list_tags_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let tags = app_state.store.list_tags().await?;
  Ok(HttpResponse::Ok().json(tags))
}
