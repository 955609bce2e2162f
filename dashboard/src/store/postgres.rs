// dashboard/src/store/postgres.rs

use super::{
  ContactStore, CustomerStore, DashboardStore, OrderHeader, OrderStore, OrderTx, ProductStore, Store, TagStore,
};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{
  Contact, ContactDraft, CustomerChoice, CustomerDraft, CustomerOverview, OrderItem, OrderItemDetail, OrderStatus,
  OrderSummary, OrderWithCustomer, PopularProduct, ProductChoice, ProductDraft, ProductListing, RecentOrder,
  ResolvedOrderItem, Tag,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Transaction};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{error, info, instrument, warn};

/// PostgreSQL backend over a shared `PgPool`.
///
/// Order transactions hold a pool connection while their product lookups
/// draw from the same pool, so at most `max_connections - 1` may be open.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
  order_slots: Arc<Semaphore>,
}

impl PgStore {
  pub async fn connect(config: &AppConfig) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(config.db_max_connections)
      .acquire_timeout(config.db_acquire_timeout)
      .connect(&config.database_url)
      .await
      .map_err(|e| {
        error!("Failed to connect to the database: {}", e);
        AppError::Sqlx(e)
      })?;
    let order_slots = config.order_transaction_slots();
    info!(max_connections = config.db_max_connections, order_slots, "Database pool opened.");
    Ok(Self {
      pool,
      order_slots: Arc::new(Semaphore::new(order_slots)),
    })
  }

  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }
}

fn foreign_key_guard(what: &'static str) -> impl Fn(sqlx::Error) -> AppError {
  move |e| match &e {
    sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
      warn!("Refusing to delete {} still referenced by orders: {}", what, db);
      AppError::Validation(format!("Some {} are still referenced by orders", what))
    }
    _ => AppError::Sqlx(e),
  }
}

#[async_trait]
impl ProductStore for PgStore {
  #[instrument(name = "store::product_name", skip(self))]
  async fn product_name(&self, product_id: i64) -> Result<Option<String>> {
    let name = sqlx::query_scalar::<_, String>("SELECT product_name FROM products WHERE id = $1")
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(name)
  }

  #[instrument(name = "store::list_products", skip(self))]
  async fn list_products(&self) -> Result<Vec<ProductListing>> {
    let rows = sqlx::query_as::<_, ProductListing>(
      "SELECT p.id, p.product_name, p.price, p.sale_price, p.stock, p.tag_id, t.tag_name, p.image_path, \
       p.created_at, p.updated_at \
       FROM products p LEFT JOIN tags t ON p.tag_id = t.id ORDER BY p.id",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  async fn product_choices(&self) -> Result<Vec<ProductChoice>> {
    let rows = sqlx::query_as::<_, ProductChoice>(
      "SELECT id, product_name, price, sale_price FROM products ORDER BY product_name",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  #[instrument(name = "store::insert_product", skip(self, draft), fields(product_name = %draft.product_name))]
  async fn insert_product(&self, draft: &ProductDraft) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
      "INSERT INTO products (product_name, price, sale_price, stock, tag_id) VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&draft.product_name)
    .bind(draft.price)
    .bind(draft.sale_price)
    .bind(draft.stock)
    .bind(draft.tag_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(id)
  }

  #[instrument(name = "store::update_product", skip(self, draft))]
  async fn update_product(&self, product_id: i64, draft: &ProductDraft) -> Result<bool> {
    let result = sqlx::query(
      "UPDATE products SET product_name = $1, price = $2, sale_price = $3, stock = $4, tag_id = $5, \
       updated_at = now() WHERE id = $6",
    )
    .bind(&draft.product_name)
    .bind(draft.price)
    .bind(draft.sale_price)
    .bind(draft.stock)
    .bind(draft.tag_id)
    .bind(product_id)
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "store::delete_products", skip(self))]
  async fn delete_products(&self, ids: &[i64]) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = ANY($1)")
      .bind(ids)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  #[instrument(name = "store::set_product_image", skip(self))]
  async fn set_product_image(&self, product_id: i64, image_path: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE products SET image_path = $1, updated_at = now() WHERE id = $2")
      .bind(image_path)
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl CustomerStore for PgStore {
  #[instrument(name = "store::insert_customer", skip(self, draft))]
  async fn insert_customer(&self, draft: &CustomerDraft) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>("INSERT INTO customers (name, email) VALUES ($1, $2) RETURNING id")
      .bind(&draft.name)
      .bind(&draft.email)
      .fetch_one(&self.pool)
      .await?;
    Ok(id)
  }

  #[instrument(name = "store::delete_customers", skip(self))]
  async fn delete_customers(&self, ids: &[i64]) -> Result<u64> {
    let result = sqlx::query("DELETE FROM customers WHERE id = ANY($1)")
      .bind(ids)
      .execute(&self.pool)
      .await
      .map_err(foreign_key_guard("customers"))?;
    Ok(result.rows_affected())
  }

  #[instrument(name = "store::customer_overviews", skip(self))]
  async fn customer_overviews(&self) -> Result<Vec<CustomerOverview>> {
    let rows = sqlx::query_as::<_, CustomerOverview>(
      "SELECT c.id, c.name, c.email, c.created_at, \
       COUNT(o.id)::BIGINT AS order_count, COALESCE(SUM(o.total_price), 0) AS total_spent \
       FROM customers c LEFT JOIN orders o ON o.customer_id = c.id \
       GROUP BY c.id ORDER BY c.id",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  async fn customer_choices(&self) -> Result<Vec<CustomerChoice>> {
    let rows = sqlx::query_as::<_, CustomerChoice>("SELECT id, name FROM customers ORDER BY name")
      .fetch_all(&self.pool)
      .await?;
    Ok(rows)
  }
}

/// Order submission transaction on one pooled connection.
pub struct PgOrderTx {
  tx: Transaction<'static, Postgres>,
  _slot: OwnedSemaphorePermit,
}

#[async_trait]
impl OrderTx for PgOrderTx {
  #[instrument(name = "store::insert_order_header", skip(self, header), fields(customer_id = header.customer_id))]
  async fn insert_order_header(&mut self, header: &OrderHeader) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
      "INSERT INTO orders (customer_id, payment_method, status, total_price) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(header.customer_id)
    .bind(&header.payment_method)
    .bind(header.status)
    .bind(header.total_price)
    .fetch_one(&mut *self.tx)
    .await?;
    Ok(id)
  }

  #[instrument(name = "store::insert_order_items", skip(self, items), fields(rows = items.len()))]
  async fn insert_order_items(&mut self, order_id: i64, items: &[ResolvedOrderItem]) -> Result<u64> {
    if items.is_empty() {
      return Ok(0);
    }
    let mut qb: QueryBuilder<Postgres> =
      QueryBuilder::new("INSERT INTO order_items (order_id, product_id, product_name, quantity, price) ");
    qb.push_values(items, |mut row, item| {
      row
        .push_bind(order_id)
        .push_bind(item.product_id)
        .push_bind(item.product_name.clone())
        .push_bind(item.quantity)
        .push_bind(item.price);
    });
    let result = qb.build().execute(&mut *self.tx).await?;
    Ok(result.rows_affected())
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    let PgOrderTx { tx, _slot } = *self;
    tx.commit().await?;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<()> {
    let PgOrderTx { tx, _slot } = *self;
    tx.rollback().await?;
    Ok(())
  }
}

#[async_trait]
impl OrderStore for PgStore {
  async fn begin_order(&self) -> Result<Box<dyn OrderTx>> {
    let slot = self
      .order_slots
      .clone()
      .acquire_owned()
      .await
      .map_err(|_| AppError::Internal("Order transaction slots closed".to_string()))?;
    let tx = self.pool.begin().await?;
    Ok(Box::new(PgOrderTx { tx, _slot: slot }))
  }

  #[instrument(name = "store::list_orders", skip(self))]
  async fn list_orders(&self) -> Result<Vec<OrderSummary>> {
    let rows = sqlx::query_as::<_, OrderSummary>(
      "SELECT o.id, c.name AS customer_name, o.payment_method, o.status, o.total_price, o.created_at \
       FROM orders o JOIN customers c ON o.customer_id = c.id ORDER BY o.created_at DESC, o.id DESC",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  #[instrument(name = "store::find_order", skip(self))]
  async fn find_order(&self, order_id: i64) -> Result<Option<OrderWithCustomer>> {
    let row = sqlx::query_as::<_, OrderWithCustomer>(
      "SELECT o.id, o.customer_id, c.name AS customer_name, c.email AS customer_email, o.payment_method, \
       o.status, o.total_price, o.created_at \
       FROM orders o JOIN customers c ON o.customer_id = c.id WHERE o.id = $1",
    )
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(row)
  }

  #[instrument(name = "store::order_items", skip(self))]
  async fn order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
      "SELECT id, order_id, product_id, product_name, quantity, price, created_at \
       FROM order_items WHERE order_id = $1 ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  #[instrument(name = "store::order_item_details", skip(self))]
  async fn order_item_details(&self, order_id: i64) -> Result<Vec<OrderItemDetail>> {
    let rows = sqlx::query_as::<_, OrderItemDetail>(
      "SELECT oi.id, oi.product_id, oi.product_name, p.product_name AS current_product_name, \
       oi.quantity, oi.price, (oi.quantity * oi.price) AS line_total \
       FROM order_items oi LEFT JOIN products p ON p.id = oi.product_id \
       WHERE oi.order_id = $1 ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  #[instrument(name = "store::delete_orders", skip(self))]
  async fn delete_orders(&self, ids: &[i64]) -> Result<u64> {
    let mut tx = self.pool.begin().await?;
    sqlx::query("DELETE FROM order_items WHERE order_id = ANY($1)")
      .bind(ids)
      .execute(&mut *tx)
      .await?;
    let result = sqlx::query("DELETE FROM orders WHERE id = ANY($1)")
      .bind(ids)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
  }

  #[instrument(name = "store::update_order_status", skip(self))]
  async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<bool> {
    let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
      .bind(status)
      .bind(order_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl ContactStore for PgStore {
  #[instrument(name = "store::insert_contact", skip(self, draft))]
  async fn insert_contact(&self, draft: &ContactDraft) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
      "INSERT INTO contacts (vendor_name, vendor_email, vendor_phone, vendor_address, vendor_note) \
       VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&draft.vendor_name)
    .bind(&draft.vendor_email)
    .bind(&draft.vendor_phone)
    .bind(&draft.vendor_address)
    .bind(&draft.vendor_note)
    .fetch_one(&self.pool)
    .await?;
    Ok(id)
  }

  #[instrument(name = "store::delete_contacts", skip(self))]
  async fn delete_contacts(&self, ids: &[i64]) -> Result<u64> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ANY($1)")
      .bind(ids)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  async fn list_contacts(&self) -> Result<Vec<Contact>> {
    let rows = sqlx::query_as::<_, Contact>(
      "SELECT id, vendor_name, vendor_email, vendor_phone, vendor_address, vendor_note, created_at \
       FROM contacts ORDER BY id",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }
}

#[async_trait]
impl TagStore for PgStore {
  async fn list_tags(&self) -> Result<Vec<Tag>> {
    let rows = sqlx::query_as::<_, Tag>("SELECT id, tag_name FROM tags ORDER BY id")
      .fetch_all(&self.pool)
      .await?;
    Ok(rows)
  }
}

#[async_trait]
impl DashboardStore for PgStore {
  async fn total_revenue(&self) -> Result<Decimal> {
    let revenue = sqlx::query_scalar::<_, Decimal>(
      "SELECT COALESCE(SUM(oi.quantity * (oi.price - p.price)), 0) \
       FROM order_items oi JOIN products p ON oi.product_id = p.id",
    )
    .fetch_one(&self.pool)
    .await?;
    Ok(revenue)
  }

  async fn total_orders(&self) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM orders")
      .fetch_one(&self.pool)
      .await?;
    Ok(count)
  }

  async fn popular_products(&self, limit: i64) -> Result<Vec<PopularProduct>> {
    let rows = sqlx::query_as::<_, PopularProduct>(
      "SELECT p.id AS product_id, p.product_name, p.sale_price, p.stock, SUM(oi.quantity)::BIGINT AS total_sold \
       FROM order_items oi JOIN products p ON oi.product_id = p.id \
       GROUP BY p.id ORDER BY total_sold DESC, p.id LIMIT $1",
    )
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  async fn recent_orders(&self, limit: i64) -> Result<Vec<RecentOrder>> {
    let rows = sqlx::query_as::<_, RecentOrder>(
      "SELECT o.id AS order_id, o.total_price, c.name AS customer_name \
       FROM orders o JOIN customers c ON o.customer_id = c.id \
       ORDER BY o.created_at DESC, o.id DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }
}

#[async_trait]
impl Store for PgStore {
  fn backend_tag(&self) -> &'static str {
    "postgres"
  }

  async fn ping(&self) -> Result<()> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  async fn close(&self) {
    self.pool.close().await;
    info!("Database pool closed.");
  }
}
