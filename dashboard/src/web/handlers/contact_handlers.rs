// dashboard/src/web/handlers/contact_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use super::IdsPayload;
use crate::errors::AppError;
use crate::models::{require_ids, ContactInput};
use crate::state::AppState;
use crate::store::ContactStore;

#[instrument(name = "handler::add_contact", skip(app_state, req_payload))]
pub async fn add_contact_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<ContactInput>,
) -> Result<HttpResponse, AppError> {
  let draft = req_payload
    .into_inner()
    .into_draft()
    .map_err(|_| AppError::Validation("Vendor Name, Email, and Phone are required.".to_string()))?;
  let contact_id = app_state.store.insert_contact(&draft).await?;
  info!(contact_id, "Contact created.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Contact added successfully",
      "contactId": contact_id
  })))
}

#[instrument(name = "handler::delete_contacts", skip(app_state, req_payload))]
pub async fn delete_contacts_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<IdsPayload>,
) -> Result<HttpResponse, AppError> {
  let ids = require_ids(req_payload.into_inner().ids, "contact")?;
  let deleted = app_state.store.delete_contacts(&ids).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Contacts deleted successfully", "deleted": deleted })))
}
