// dashboard/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{require_ids, AddOrderRequest, OrderStatus};
use crate::pipelines::submit_order;
use crate::state::AppState;
use crate::store::OrderStore;

#[derive(Deserialize, Debug)]
pub struct DeleteOrdersPayload {
  #[serde(rename = "orderIds")]
  pub order_ids: Option<Vec<i64>>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusPayload {
  pub status: Option<String>,
}

#[instrument(name = "handler::add_order", skip(app_state, req_payload))]
pub async fn add_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let new_order = req_payload.into_inner().into_new_order()?;
  let order_id = submit_order(app_state.get_ref(), new_order).await?;

  Ok(HttpResponse::Created().json(json!({
      "message": "Order added successfully",
      "orderId": order_id
  })))
}

#[instrument(name = "handler::order_items", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn order_items_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let items = app_state.store.order_items(order_id).await?;
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(name = "handler::delete_orders", skip(app_state, req_payload))]
pub async fn delete_orders_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<DeleteOrdersPayload>,
) -> Result<HttpResponse, AppError> {
  let ids = require_ids(req_payload.into_inner().order_ids, "order")?;
  let deleted = app_state.store.delete_orders(&ids).await?;
  info!(requested = ids.len(), deleted, "Orders deleted.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Orders deleted successfully", "deleted": deleted })))
}

#[instrument(name = "handler::update_order_status", skip(app_state, path, req_payload), fields(order_id = %path.as_ref()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  req_payload: web::Json<UpdateStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let status = req_payload
    .into_inner()
    .status
    .as_deref()
    .map(str::parse::<OrderStatus>)
    .transpose()
    .ok()
    .flatten()
    .filter(OrderStatus::is_update_target)
    .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?;

  if !app_state.store.update_order_status(order_id, status).await? {
    warn!(order_id, "Status update targeted a missing order.");
    return Err(AppError::NotFound(format!("Order {} not found", order_id)));
  }
  info!(order_id, %status, "Order status updated.");
  Ok(HttpResponse::Ok().json(json!({ "message": format!("Order status updated to {}", status) })))
}
