// tests/page_tests.rs
#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use backoffice_dashboard::models::{LineItem, NewOrder, OrderStatus};
use backoffice_dashboard::pipelines::submit_order;
use common::*;
use rust_decimal_macros::dec;

async fn place_scenario_order(t: &TestApp) -> i64 {
  submit_order(
    &t.state,
    NewOrder {
      customer_id: 7,
      payment_method: "card".to_string(),
      status: OrderStatus::Pending,
      total_price: dec!(59.98),
      items: vec![
        LineItem {
          product_id: 3,
          quantity: 2,
          price: dec!(19.99),
        },
        LineItem {
          product_id: 5,
          quantity: 1,
          price: dec!(19.99),
        },
      ],
    },
  )
  .await
  .expect("scenario order must be accepted")
}

async fn get_page(t: &TestApp, uri: &str) -> (StatusCode, String) {
  let app = test_service!(t.state);
  let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
  let status = resp.status();
  let body = test::read_body(resp).await;
  (status, String::from_utf8_lossy(&body).into_owned())
}

#[actix_web::test]
async fn every_listing_page_renders() {
  let t = test_app();
  seed_scenario(&t.store);
  place_scenario_order(&t).await;

  for uri in [
    "/",
    "/ecommerce-index",
    "/ecommerce-products",
    "/ecommerce-customers",
    "/ecommerce-orders",
    "/apps-contact-list",
  ] {
    let (status, body) = get_page(&t, uri).await;
    assert_eq!(status, StatusCode::OK, "{} should render", uri);
    assert!(body.contains("Back Office"), "{} should use the layout", uri);
  }
}

#[actix_web::test]
async fn dashboard_shows_revenue_and_recent_orders() {
  let t = test_app();
  seed_scenario(&t.store);
  place_scenario_order(&t).await;

  let (status, body) = get_page(&t, "/").await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.contains("59.98"));
  assert!(body.contains("Grace Hopper"));
}

#[actix_web::test]
async fn customers_page_shows_aggregates() {
  let t = test_app();
  seed_scenario(&t.store);
  place_scenario_order(&t).await;

  let (_, body) = get_page(&t, "/ecommerce-customers").await;
  assert!(body.contains("grace@example.com"));
  assert!(body.contains("59.98"));
}

#[actix_web::test]
async fn order_details_show_snapshot_and_current_names() {
  let t = test_app();
  seed_scenario(&t.store);
  let order_id = place_scenario_order(&t).await;
  t.store.rename_product(3, "Widget Pro");

  let (status, body) = get_page(&t, &format!("/order-details/{}", order_id)).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.contains("Widget"));
  assert!(body.contains("Widget Pro"));
  assert!(body.contains("39.98"), "line total of 2 x 19.99");

  let (status, body) = get_page(&t, &format!("/invoice/{}", order_id)).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.contains("Gadget"));
}

#[actix_web::test]
async fn missing_order_page_is_not_found() {
  let t = test_app();

  let (status, body) = get_page(&t, "/order-details/4242").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body.contains("Order 4242 not found"));

  let (status, _) = get_page(&t, "/invoice/4242").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
