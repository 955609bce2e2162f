// dashboard/src/web/handlers/product_handlers.rs

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use super::IdsPayload;
use crate::errors::AppError;
use crate::models::{require_ids, ProductInput, UpdateProductInput};
use crate::state::AppState;
use crate::store::ProductStore;

#[instrument(name = "handler::add_product", skip(app_state, req_payload))]
pub async fn add_product_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
  let draft = req_payload.into_inner().into_draft()?;
  let product_id = app_state.store.insert_product(&draft).await.map_err(|e| {
    error!("Error inserting product: {}", e);
    e
  })?;
  info!(product_id, "Product created.");

  Ok(HttpResponse::Created().json(json!({
      "message": "Product details saved successfully",
      "productId": product_id
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, req_payload))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<UpdateProductInput>,
) -> Result<HttpResponse, AppError> {
  let (product_id, draft) = req_payload.into_inner().into_parts()?;
  if !app_state.store.update_product(product_id, &draft).await? {
    warn!(product_id, "Update targeted a missing product.");
    return Err(AppError::NotFound(format!("Product {} not found", product_id)));
  }
  Ok(HttpResponse::Ok().json(json!({ "message": "Product updated successfully" })))
}

#[instrument(name = "handler::delete_products", skip(app_state, req_payload))]
pub async fn delete_products_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<IdsPayload>,
) -> Result<HttpResponse, AppError> {
  let ids = require_ids(req_payload.into_inner().ids, "product")?;
  let deleted = app_state.store.delete_products(&ids).await?;
  info!(requested = ids.len(), deleted, "Products deleted.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Products deleted successfully", "deleted": deleted })))
}

fn multipart_error(e: actix_multipart::MultipartError) -> AppError {
  AppError::Upload(format!("Malformed multipart body: {}", e))
}

/// Accepts `product_image` (file) and `product_id` (text) multipart fields.
#[instrument(name = "handler::upload_product_image", skip(app_state, payload))]
pub async fn upload_product_image_handler(
  app_state: web::Data<AppState>,
  mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let max_bytes = app_state.images.max_bytes();
  let mut product_id_raw: Option<String> = None;
  let mut original_name: Option<String> = None;
  let mut image: Vec<u8> = Vec::new();

  while let Some(field) = payload.next().await {
    let mut field = field.map_err(multipart_error)?;
    let field_name = field.name().map(str::to_owned);
    match field_name.as_deref() {
      Some("product_image") => {
        original_name = field
          .content_disposition()
          .and_then(|cd| cd.get_filename())
          .map(str::to_owned);
        while let Some(chunk) = field.next().await {
          let chunk = chunk.map_err(multipart_error)?;
          if image.len() + chunk.len() > max_bytes {
            warn!(max_bytes, "Rejected oversized image upload.");
            return Err(AppError::Upload(format!("Image exceeds the {} byte limit", max_bytes)));
          }
          image.extend_from_slice(&chunk);
        }
      }
      Some("product_id") => {
        let mut raw = Vec::new();
        while let Some(chunk) = field.next().await {
          raw.extend_from_slice(&chunk.map_err(multipart_error)?);
        }
        product_id_raw = Some(String::from_utf8_lossy(&raw).trim().to_string());
      }
      _ => {
        while let Some(chunk) = field.next().await {
          chunk.map_err(multipart_error)?;
        }
      }
    }
  }

  if image.is_empty() {
    return Err(AppError::Upload("No image uploaded".to_string()));
  }
  let product_id = product_id_raw
    .filter(|raw| !raw.is_empty())
    .ok_or_else(|| AppError::Validation("product_id is required".to_string()))?
    .parse::<i64>()
    .map_err(|_| AppError::Validation("product_id must be a number".to_string()))?;

  let stored = app_state.images.store(original_name.as_deref(), &image).await?;
  match app_state.store.set_product_image(product_id, &stored.public_path).await {
    Ok(true) => {
      info!(product_id, image_path = %stored.public_path, "Product image updated.");
      Ok(HttpResponse::Ok().json(json!({
          "message": "Image uploaded successfully",
          "imagePath": stored.public_path
      })))
    }
    Ok(false) => {
      app_state.images.remove(&stored).await;
      Err(AppError::NotFound(format!("Product {} not found", product_id)))
    }
    Err(e) => {
      app_state.images.remove(&stored).await;
      Err(e)
    }
  }
}
