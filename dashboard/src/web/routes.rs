// dashboard/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::{
  contact_handlers, customer_handlers, order_handlers, page_handlers, product_handlers, tag_handlers,
};

/// Reports whether the store answers a ping.
async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  let store = app_state.store.backend_tag();
  match app_state.store.ping().await {
    Ok(()) => HttpResponse::Ok().json(json!({ "status": "ok", "store": store })),
    Err(e) => {
      warn!(error = %e, "Health check ping failed.");
      HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable", "store": store }))
    }
  }
}

/// Malformed JSON bodies become validation errors with the usual error body.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(json_config())
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/api")
        .route("/add-order", web::post().to(order_handlers::add_order_handler))
        .route("/order-items/{order_id}", web::get().to(order_handlers::order_items_handler))
        .route("/delete-orders", web::post().to(order_handlers::delete_orders_handler))
        .route(
          "/update-order-status/{order_id}",
          web::post().to(order_handlers::update_order_status_handler),
        )
        .route("/add-product-details", web::post().to(product_handlers::add_product_handler))
        .route("/update-product", web::post().to(product_handlers::update_product_handler))
        .route("/delete-products", web::post().to(product_handlers::delete_products_handler))
        .route(
          "/upload-product-image",
          web::post().to(product_handlers::upload_product_image_handler),
        )
        .route("/add-customer", web::post().to(customer_handlers::add_customer_handler))
        .route("/delete-customers", web::post().to(customer_handlers::delete_customers_handler))
        .route("/add-contact", web::post().to(contact_handlers::add_contact_handler))
        .route("/delete-contacts", web::post().to(contact_handlers::delete_contacts_handler))
        .route("/tags", web::get().to(tag_handlers::list_tags_handler)),
    )
    .route("/", web::get().to(page_handlers::dashboard_page))
    .route("/ecommerce-index", web::get().to(page_handlers::dashboard_page))
    .route("/ecommerce-products", web::get().to(page_handlers::products_page))
    .route("/ecommerce-customers", web::get().to(page_handlers::customers_page))
    .route("/ecommerce-orders", web::get().to(page_handlers::orders_page))
    .route("/order-details/{order_id}", web::get().to(page_handlers::order_details_page))
    .route("/invoice/{order_id}", web::get().to(page_handlers::invoice_page))
    .route("/apps-contact-list", web::get().to(page_handlers::contacts_page));
}
