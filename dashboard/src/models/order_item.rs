// dashboard/src/models/order_item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A persisted line of an order. `product_name` is the name the product had
/// when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OrderItem {
  pub id: i64,
  pub order_id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub quantity: i32,
  pub price: Decimal,
  pub created_at: DateTime<Utc>,
}

/// A line item whose product name has been looked up, ready for the bulk insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrderItem {
  pub product_id: i64,
  pub product_name: String,
  pub quantity: i32,
  pub price: Decimal,
}

/// Order detail row: the snapshot name plus the product's current name, if the
/// product still exists.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItemDetail {
  pub id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub current_product_name: Option<String>,
  pub quantity: i32,
  pub price: Decimal,
  pub line_total: Decimal,
}
