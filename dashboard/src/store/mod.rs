// dashboard/src/store/mod.rs

//! Row store gateway: typed async access to the relational store.
//!
//! Handlers and pipelines see only these traits. `postgres::PgStore` is the
//! production backend; `memory::MemoryStore` keeps everything in process and
//! backs the test suite.

pub mod memory;
pub mod postgres;

use crate::errors::Result;
use crate::models::{
  Contact, ContactDraft, CustomerChoice, CustomerDraft, CustomerOverview, OrderItem, OrderItemDetail, OrderStatus,
  OrderSummary, OrderWithCustomer, PopularProduct, ProductChoice, ProductDraft, ProductListing, RecentOrder,
  ResolvedOrderItem, Tag,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Order-level fields written by the header insert.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHeader {
  pub customer_id: i64,
  pub payment_method: String,
  pub status: OrderStatus,
  pub total_price: Decimal,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
  /// Current display name of a product, `None` when no such product exists.
  async fn product_name(&self, product_id: i64) -> Result<Option<String>>;
  async fn list_products(&self) -> Result<Vec<ProductListing>>;
  async fn product_choices(&self) -> Result<Vec<ProductChoice>>;
  async fn insert_product(&self, draft: &ProductDraft) -> Result<i64>;
  /// Returns whether a row was updated.
  async fn update_product(&self, product_id: i64, draft: &ProductDraft) -> Result<bool>;
  async fn delete_products(&self, ids: &[i64]) -> Result<u64>;
  async fn set_product_image(&self, product_id: i64, image_path: &str) -> Result<bool>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
  async fn insert_customer(&self, draft: &CustomerDraft) -> Result<i64>;
  async fn delete_customers(&self, ids: &[i64]) -> Result<u64>;
  /// Every customer with order count and total spent.
  async fn customer_overviews(&self) -> Result<Vec<CustomerOverview>>;
  async fn customer_choices(&self) -> Result<Vec<CustomerChoice>>;
}

/// A unit of work for one order submission. Dropping it without `commit`
/// discards everything written through it.
#[async_trait]
pub trait OrderTx: Send {
  async fn insert_order_header(&mut self, header: &OrderHeader) -> Result<i64>;
  /// Writes all rows with a single statement.
  async fn insert_order_items(&mut self, order_id: i64, items: &[ResolvedOrderItem]) -> Result<u64>;
  async fn commit(self: Box<Self>) -> Result<()>;
  async fn rollback(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn begin_order(&self) -> Result<Box<dyn OrderTx>>;
  /// Orders with customer names, newest first.
  async fn list_orders(&self) -> Result<Vec<OrderSummary>>;
  async fn find_order(&self, order_id: i64) -> Result<Option<OrderWithCustomer>>;
  async fn order_items(&self, order_id: i64) -> Result<Vec<OrderItem>>;
  async fn order_item_details(&self, order_id: i64) -> Result<Vec<OrderItemDetail>>;
  /// Deletes the orders and their items atomically; returns deleted headers.
  async fn delete_orders(&self, ids: &[i64]) -> Result<u64>;
  async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<bool>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
  async fn insert_contact(&self, draft: &ContactDraft) -> Result<i64>;
  async fn delete_contacts(&self, ids: &[i64]) -> Result<u64>;
  async fn list_contacts(&self) -> Result<Vec<Contact>>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
  async fn list_tags(&self) -> Result<Vec<Tag>>;
}

#[async_trait]
pub trait DashboardStore: Send + Sync {
  async fn total_revenue(&self) -> Result<Decimal>;
  async fn total_orders(&self) -> Result<i64>;
  async fn popular_products(&self, limit: i64) -> Result<Vec<PopularProduct>>;
  async fn recent_orders(&self, limit: i64) -> Result<Vec<RecentOrder>>;
}

/// Everything the application needs from a backend.
#[async_trait]
pub trait Store: ProductStore + CustomerStore + OrderStore + ContactStore + TagStore + DashboardStore {
  fn backend_tag(&self) -> &'static str;
  async fn ping(&self) -> Result<()>;
  async fn close(&self);
}
