// dashboard/src/web/handlers/customer_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use super::IdsPayload;
use crate::errors::AppError;
use crate::models::{require_ids, CustomerInput};
use crate::state::AppState;
use crate::store::CustomerStore;

#[instrument(name = "handler::add_customer", skip(app_state, req_payload))]
pub async fn add_customer_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CustomerInput>,
) -> Result<HttpResponse, AppError> {
  let draft = req_payload
    .into_inner()
    .into_draft()
    .map_err(|_| AppError::Validation("Name and Email are required".to_string()))?;
  let customer_id = app_state.store.insert_customer(&draft).await?;
  info!(customer_id, "Customer created.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Customer added successfully",
      "customerId": customer_id
  })))
}

#[instrument(name = "handler::delete_customers", skip(app_state, req_payload))]
pub async fn delete_customers_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<IdsPayload>,
) -> Result<HttpResponse, AppError> {
  let ids = require_ids(req_payload.into_inner().ids, "customer")?;
  let deleted = app_state.store.delete_customers(&ids).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Customers deleted successfully", "deleted": deleted })))
}
