// dashboard/src/web/handlers/page_handlers.rs

//! Server-rendered back-office pages.

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::models::DashboardSummary;
use crate::state::AppState;
use crate::store::{ContactStore, CustomerStore, DashboardStore, OrderStore, ProductStore};

const DASHBOARD_LIST_LIMIT: i64 = 5;

fn html(body: String) -> HttpResponse {
  HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

#[instrument(name = "page::dashboard", skip(app_state))]
pub async fn dashboard_page(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let store = &app_state.store;
  let (total_revenue, total_orders, popular_products, recent_orders) = tokio::try_join!(
    store.total_revenue(),
    store.total_orders(),
    store.popular_products(DASHBOARD_LIST_LIMIT),
    store.recent_orders(DASHBOARD_LIST_LIMIT),
  )?;
  let summary = DashboardSummary {
    total_revenue,
    total_orders,
    popular_products,
    recent_orders,
  };
  let body = app_state
    .views
    .render("index.html", json!({ "title": "Dashboard", "summary": summary }))?;
  Ok(html(body))
}

#[instrument(name = "page::products", skip(app_state))]
pub async fn products_page(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.store.list_products().await?;
  let body = app_state
    .views
    .render("products.html", json!({ "title": "Ecommerce Products", "products": products }))?;
  Ok(html(body))
}

#[instrument(name = "page::customers", skip(app_state))]
pub async fn customers_page(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let customers = app_state.store.customer_overviews().await?;
  let body = app_state
    .views
    .render("customers.html", json!({ "title": "Customers", "customers": customers }))?;
  Ok(html(body))
}

#[instrument(name = "page::orders", skip(app_state))]
pub async fn orders_page(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let store = &app_state.store;
  let (orders, customers, products) =
    tokio::try_join!(store.list_orders(), store.customer_choices(), store.product_choices())?;
  let body = app_state.views.render(
    "orders.html",
    json!({ "title": "Orders List", "orders": orders, "customers": customers, "products": products }),
  )?;
  Ok(html(body))
}

#[instrument(name = "page::order_details", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn order_details_page(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  render_order(&app_state, path.into_inner(), "order_details.html", "Order").await
}

#[instrument(name = "page::invoice", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn invoice_page(app_state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
  render_order(&app_state, path.into_inner(), "invoice.html", "Invoice").await
}

async fn render_order(
  app_state: &AppState,
  order_id: i64,
  template: &str,
  title_prefix: &str,
) -> Result<HttpResponse, AppError> {
  let store = &app_state.store;
  let (order, items) = tokio::try_join!(store.find_order(order_id), store.order_item_details(order_id))?;
  let order = order.ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;
  let body = app_state.views.render(
    template,
    json!({ "title": format!("{} #{}", title_prefix, order_id), "order": order, "items": items }),
  )?;
  Ok(html(body))
}

#[instrument(name = "page::contacts", skip(app_state))]
pub async fn contacts_page(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let contacts = app_state.store.list_contacts().await?;
  let body = app_state
    .views
    .render("contacts.html", json!({ "title": "Contacts", "contacts": contacts }))?;
  Ok(html(body))
}
