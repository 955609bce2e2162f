// dashboard/src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PopularProduct {
  pub product_id: i64,
  pub product_name: String,
  pub sale_price: Option<Decimal>,
  pub stock: i32,
  pub total_sold: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentOrder {
  pub order_id: i64,
  pub total_price: Decimal,
  pub customer_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
  /// `SUM(quantity * (item price - current product price))`, zero without orders.
  pub total_revenue: Decimal,
  pub total_orders: i64,
  pub popular_products: Vec<PopularProduct>,
  pub recent_orders: Vec<RecentOrder>,
}
