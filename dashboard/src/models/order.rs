// dashboard/src/models/order.rs

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Completed,
  Canceled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Completed => "completed",
      OrderStatus::Canceled => "canceled",
    }
  }

  /// Status updates may only close an order.
  pub fn is_update_target(&self) -> bool {
    matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "pending" => Ok(OrderStatus::Pending),
      "completed" => Ok(OrderStatus::Completed),
      "canceled" | "cancelled" => Ok(OrderStatus::Canceled),
      other => Err(AppError::Validation(format!("Invalid status '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: i64,
  pub customer_id: i64,
  pub payment_method: String,
  pub status: OrderStatus,
  pub total_price: Decimal,
  pub created_at: DateTime<Utc>,
}

/// Row of the orders page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderSummary {
  pub id: i64,
  pub customer_name: String,
  pub payment_method: String,
  pub status: OrderStatus,
  pub total_price: Decimal,
  pub created_at: DateTime<Utc>,
}

/// Header of the order detail and invoice pages.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderWithCustomer {
  pub id: i64,
  pub customer_id: i64,
  pub customer_name: String,
  pub customer_email: String,
  pub payment_method: String,
  pub status: OrderStatus,
  pub total_price: Decimal,
  pub created_at: DateTime<Utc>,
}

/// A requested line: product, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub product_id: i64,
  pub quantity: i32,
  pub price: Decimal,
}

/// Body of `POST /api/add-order`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderRequest {
  pub customer_id: Option<i64>,
  pub payment_method: Option<String>,
  pub status: Option<String>,
  #[serde(default)]
  pub order_items: Vec<LineItem>,
  pub total_price: Option<Decimal>,
}

/// A validated order submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub customer_id: i64,
  pub payment_method: String,
  pub status: OrderStatus,
  pub total_price: Decimal,
  pub items: Vec<LineItem>,
}

impl AddOrderRequest {
  pub fn into_new_order(self) -> Result<NewOrder> {
    let customer_id = self
      .customer_id
      .ok_or_else(|| AppError::Validation("customerId is required".to_string()))?;
    let payment_method = super::required_text(self.payment_method, "paymentMethod")?;
    let status = match self.status {
      Some(s) if !s.trim().is_empty() => s.parse::<OrderStatus>()?,
      _ => OrderStatus::Pending,
    };
    let total_price = self
      .total_price
      .ok_or_else(|| AppError::Validation("totalPrice is required".to_string()))?;

    for item in &self.order_items {
      if item.quantity <= 0 {
        return Err(AppError::Validation(format!(
          "Quantity for product {} must be positive",
          item.product_id
        )));
      }
      if item.price.is_sign_negative() {
        return Err(AppError::Validation(format!(
          "Price for product {} must not be negative",
          item.product_id
        )));
      }
    }

    Ok(NewOrder {
      customer_id,
      payment_method,
      status,
      total_price,
      items: self.order_items,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn add_order_request_uses_camel_case_keys() {
    let body = r#"{"customerId":7,"paymentMethod":"card","status":"pending","totalPrice":59.98,
      "orderItems":[{"productId":3,"quantity":2,"price":19.99},{"productId":5,"quantity":1,"price":19.99}]}"#;
    let order = serde_json::from_str::<AddOrderRequest>(body).unwrap().into_new_order().unwrap();
    assert_eq!(order.customer_id, 7);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_price, dec!(59.98));
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[1].product_id, 5);
  }

  #[test]
  fn missing_items_mean_an_empty_order() {
    let body = r#"{"customerId":1,"paymentMethod":"cash","totalPrice":0}"#;
    let order = serde_json::from_str::<AddOrderRequest>(body).unwrap().into_new_order().unwrap();
    assert!(order.items.is_empty());
    assert_eq!(order.status, OrderStatus::Pending);
  }

  #[test]
  fn non_positive_quantities_are_rejected() {
    let request = AddOrderRequest {
      customer_id: Some(1),
      payment_method: Some("card".into()),
      total_price: Some(dec!(1)),
      order_items: vec![LineItem {
        product_id: 1,
        quantity: 0,
        price: dec!(1),
      }],
      ..Default::default()
    };
    assert!(matches!(request.into_new_order(), Err(AppError::Validation(_))));
  }

  #[test]
  fn only_completed_and_canceled_are_update_targets() {
    assert!("completed".parse::<OrderStatus>().unwrap().is_update_target());
    assert!("canceled".parse::<OrderStatus>().unwrap().is_update_target());
    assert!(!"pending".parse::<OrderStatus>().unwrap().is_update_target());
    assert!("shipped".parse::<OrderStatus>().is_err());
  }
}
