// dashboard/src/store/memory.rs

//! In-process store used by the test suite and for local runs without a
//! database. Supports injected lookup latency and write failures.

use super::{
  ContactStore, CustomerStore, DashboardStore, OrderHeader, OrderStore, OrderTx, ProductStore, Store, TagStore,
};
use crate::errors::{AppError, Result};
use crate::models::{
  Contact, ContactDraft, Customer, CustomerChoice, CustomerDraft, CustomerOverview, Order, OrderItem, OrderItemDetail,
  OrderStatus, OrderSummary, OrderWithCustomer, PopularProduct, Product, ProductChoice, ProductDraft, ProductListing,
  RecentOrder, ResolvedOrderItem, Tag,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Identity sequences. Like `BIGSERIAL`, values are never reused, even when a
/// transaction that drew one is rolled back.
#[derive(Default)]
struct Sequences {
  tag: i64,
  product: i64,
  customer: i64,
  order: i64,
  order_item: i64,
  contact: i64,
}

fn next(seq: &mut i64) -> i64 {
  *seq += 1;
  *seq
}

#[derive(Default)]
struct Tables {
  seq: Sequences,
  tags: Vec<Tag>,
  products: Vec<Product>,
  customers: Vec<Customer>,
  orders: Vec<Order>,
  order_items: Vec<OrderItem>,
  contacts: Vec<Contact>,
}

impl Tables {
  fn product(&self, id: i64) -> Option<&Product> {
    self.products.iter().find(|p| p.id == id)
  }

  fn customer(&self, id: i64) -> Option<&Customer> {
    self.customers.iter().find(|c| c.id == id)
  }
}

#[derive(Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
  lookup_delays: Mutex<HashMap<i64, Duration>>,
  lookup_calls: AtomicUsize,
  bulk_insert_calls: Arc<AtomicUsize>,
  fail_header_insert: AtomicBool,
  fail_item_insert: AtomicBool,
  unhealthy: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn seed_tag(&self, tag_name: &str) -> i64 {
    let mut tables = self.tables.lock();
    let id = next(&mut tables.seq.tag);
    tables.tags.push(Tag {
      id,
      tag_name: tag_name.to_string(),
    });
    id
  }

  pub fn seed_product(&self, product_name: &str, price: Decimal) -> i64 {
    let id = self.tables.lock().seq.product + 1;
    self.seed_product_with_id(id, product_name, price);
    id
  }

  /// Inserts a product under a fixed id, advancing the sequence past it.
  pub fn seed_product_with_id(&self, id: i64, product_name: &str, price: Decimal) {
    let mut tables = self.tables.lock();
    tables.seq.product = tables.seq.product.max(id);
    let now = Utc::now();
    tables.products.push(Product {
      id,
      product_name: product_name.to_string(),
      price,
      sale_price: None,
      stock: 0,
      tag_id: None,
      image_path: None,
      created_at: now,
      updated_at: now,
    });
  }

  pub fn seed_customer_with_id(&self, id: i64, name: &str, email: &str) {
    let mut tables = self.tables.lock();
    tables.seq.customer = tables.seq.customer.max(id);
    tables.customers.push(Customer {
      id,
      name: name.to_string(),
      email: email.to_string(),
      created_at: Utc::now(),
    });
  }

  pub fn rename_product(&self, id: i64, product_name: &str) {
    if let Some(product) = self.tables.lock().products.iter_mut().find(|p| p.id == id) {
      product.product_name = product_name.to_string();
      product.updated_at = Utc::now();
    }
  }

  /// Delays every `product_name` lookup of `product_id` by `delay`.
  pub fn set_lookup_delay(&self, product_id: i64, delay: Duration) {
    self.lookup_delays.lock().insert(product_id, delay);
  }

  pub fn fail_header_inserts(&self, fail: bool) {
    self.fail_header_insert.store(fail, Ordering::SeqCst);
  }

  pub fn fail_item_inserts(&self, fail: bool) {
    self.fail_item_insert.store(fail, Ordering::SeqCst);
  }

  pub fn set_unhealthy(&self, unhealthy: bool) {
    self.unhealthy.store(unhealthy, Ordering::SeqCst);
  }

  pub fn lookup_calls(&self) -> usize {
    self.lookup_calls.load(Ordering::SeqCst)
  }

  pub fn bulk_insert_calls(&self) -> usize {
    self.bulk_insert_calls.load(Ordering::SeqCst)
  }

  pub fn orders(&self) -> Vec<Order> {
    self.tables.lock().orders.clone()
  }

  pub fn all_order_items(&self) -> Vec<OrderItem> {
    self.tables.lock().order_items.clone()
  }

  pub fn products(&self) -> Vec<Product> {
    self.tables.lock().products.clone()
  }

  pub fn customers(&self) -> Vec<Customer> {
    self.tables.lock().customers.clone()
  }

  pub fn contacts(&self) -> Vec<Contact> {
    self.tables.lock().contacts.clone()
  }
}

fn injected_failure(what: &str) -> AppError {
  AppError::Sqlx(sqlx::Error::Protocol(format!("injected failure: {}", what)))
}

#[async_trait]
impl ProductStore for MemoryStore {
  async fn product_name(&self, product_id: i64) -> Result<Option<String>> {
    self.lookup_calls.fetch_add(1, Ordering::SeqCst);
    let delay = self.lookup_delays.lock().get(&product_id).copied();
    if let Some(delay) = delay {
      tokio::time::sleep(delay).await;
    }
    Ok(self.tables.lock().product(product_id).map(|p| p.product_name.clone()))
  }

  async fn list_products(&self) -> Result<Vec<ProductListing>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .products
        .iter()
        .map(|p| ProductListing {
          id: p.id,
          product_name: p.product_name.clone(),
          price: p.price,
          sale_price: p.sale_price,
          stock: p.stock,
          tag_id: p.tag_id,
          tag_name: p
            .tag_id
            .and_then(|tag_id| tables.tags.iter().find(|t| t.id == tag_id))
            .map(|t| t.tag_name.clone()),
          image_path: p.image_path.clone(),
          created_at: p.created_at,
          updated_at: p.updated_at,
        })
        .collect(),
    )
  }

  async fn product_choices(&self) -> Result<Vec<ProductChoice>> {
    let mut choices: Vec<ProductChoice> = self
      .tables
      .lock()
      .products
      .iter()
      .map(|p| ProductChoice {
        id: p.id,
        product_name: p.product_name.clone(),
        price: p.price,
        sale_price: p.sale_price,
      })
      .collect();
    choices.sort_by(|a, b| a.product_name.cmp(&b.product_name));
    Ok(choices)
  }

  async fn insert_product(&self, draft: &ProductDraft) -> Result<i64> {
    let mut tables = self.tables.lock();
    let id = next(&mut tables.seq.product);
    let now = Utc::now();
    tables.products.push(Product {
      id,
      product_name: draft.product_name.clone(),
      price: draft.price,
      sale_price: draft.sale_price,
      stock: draft.stock,
      tag_id: draft.tag_id,
      image_path: None,
      created_at: now,
      updated_at: now,
    });
    Ok(id)
  }

  async fn update_product(&self, product_id: i64, draft: &ProductDraft) -> Result<bool> {
    let mut tables = self.tables.lock();
    let Some(product) = tables.products.iter_mut().find(|p| p.id == product_id) else {
      return Ok(false);
    };
    product.product_name = draft.product_name.clone();
    product.price = draft.price;
    product.sale_price = draft.sale_price;
    product.stock = draft.stock;
    product.tag_id = draft.tag_id;
    product.updated_at = Utc::now();
    Ok(true)
  }

  async fn delete_products(&self, ids: &[i64]) -> Result<u64> {
    let mut tables = self.tables.lock();
    let before = tables.products.len();
    tables.products.retain(|p| !ids.contains(&p.id));
    Ok((before - tables.products.len()) as u64)
  }

  async fn set_product_image(&self, product_id: i64, image_path: &str) -> Result<bool> {
    let mut tables = self.tables.lock();
    let Some(product) = tables.products.iter_mut().find(|p| p.id == product_id) else {
      return Ok(false);
    };
    product.image_path = Some(image_path.to_string());
    product.updated_at = Utc::now();
    Ok(true)
  }
}

#[async_trait]
impl CustomerStore for MemoryStore {
  async fn insert_customer(&self, draft: &CustomerDraft) -> Result<i64> {
    let mut tables = self.tables.lock();
    let id = next(&mut tables.seq.customer);
    tables.customers.push(Customer {
      id,
      name: draft.name.clone(),
      email: draft.email.clone(),
      created_at: Utc::now(),
    });
    Ok(id)
  }

  async fn delete_customers(&self, ids: &[i64]) -> Result<u64> {
    let mut tables = self.tables.lock();
    if tables.orders.iter().any(|o| ids.contains(&o.customer_id)) {
      return Err(AppError::Validation("Some customers are still referenced by orders".to_string()));
    }
    let before = tables.customers.len();
    tables.customers.retain(|c| !ids.contains(&c.id));
    Ok((before - tables.customers.len()) as u64)
  }

  async fn customer_overviews(&self) -> Result<Vec<CustomerOverview>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .customers
        .iter()
        .map(|c| {
          let orders = tables.orders.iter().filter(|o| o.customer_id == c.id);
          let (order_count, total_spent) =
            orders.fold((0i64, Decimal::ZERO), |(n, sum), o| (n + 1, sum + o.total_price));
          CustomerOverview {
            id: c.id,
            name: c.name.clone(),
            email: c.email.clone(),
            created_at: c.created_at,
            order_count,
            total_spent,
          }
        })
        .collect(),
    )
  }

  async fn customer_choices(&self) -> Result<Vec<CustomerChoice>> {
    let mut choices: Vec<CustomerChoice> = self
      .tables
      .lock()
      .customers
      .iter()
      .map(|c| CustomerChoice {
        id: c.id,
        name: c.name.clone(),
      })
      .collect();
    choices.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(choices)
  }
}

/// Writes are staged here and only reach the tables on commit.
pub struct MemoryOrderTx {
  tables: Arc<Mutex<Tables>>,
  bulk_insert_calls: Arc<AtomicUsize>,
  fail_header_insert: bool,
  fail_item_insert: bool,
  header: Option<Order>,
  items: Vec<OrderItem>,
}

#[async_trait]
impl OrderTx for MemoryOrderTx {
  async fn insert_order_header(&mut self, header: &OrderHeader) -> Result<i64> {
    if self.fail_header_insert {
      return Err(injected_failure("order header insert"));
    }
    let mut tables = self.tables.lock();
    if tables.customer(header.customer_id).is_none() {
      return Err(AppError::Sqlx(sqlx::Error::Protocol(format!(
        "orders.customer_id {} violates foreign key",
        header.customer_id
      ))));
    }
    let id = next(&mut tables.seq.order);
    self.header = Some(Order {
      id,
      customer_id: header.customer_id,
      payment_method: header.payment_method.clone(),
      status: header.status,
      total_price: header.total_price,
      created_at: Utc::now(),
    });
    Ok(id)
  }

  async fn insert_order_items(&mut self, order_id: i64, items: &[ResolvedOrderItem]) -> Result<u64> {
    self.bulk_insert_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_item_insert {
      return Err(injected_failure("order items bulk insert"));
    }
    let mut tables = self.tables.lock();
    let now = Utc::now();
    for item in items {
      let id = next(&mut tables.seq.order_item);
      self.items.push(OrderItem {
        id,
        order_id,
        product_id: item.product_id,
        product_name: item.product_name.clone(),
        quantity: item.quantity,
        price: item.price,
        created_at: now,
      });
    }
    Ok(items.len() as u64)
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    let this = *self;
    let mut tables = this.tables.lock();
    if let Some(header) = this.header {
      tables.orders.push(header);
    }
    tables.order_items.extend(this.items);
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<()> {
    Ok(())
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn begin_order(&self) -> Result<Box<dyn OrderTx>> {
    Ok(Box::new(MemoryOrderTx {
      tables: Arc::clone(&self.tables),
      bulk_insert_calls: Arc::clone(&self.bulk_insert_calls),
      fail_header_insert: self.fail_header_insert.load(Ordering::SeqCst),
      fail_item_insert: self.fail_item_insert.load(Ordering::SeqCst),
      header: None,
      items: Vec::new(),
    }))
  }

  async fn list_orders(&self) -> Result<Vec<OrderSummary>> {
    let tables = self.tables.lock();
    let mut rows: Vec<OrderSummary> = tables
      .orders
      .iter()
      .filter_map(|o| {
        tables.customer(o.customer_id).map(|c| OrderSummary {
          id: o.id,
          customer_name: c.name.clone(),
          payment_method: o.payment_method.clone(),
          status: o.status,
          total_price: o.total_price,
          created_at: o.created_at,
        })
      })
      .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(rows)
  }

  async fn find_order(&self, order_id: i64) -> Result<Option<OrderWithCustomer>> {
    let tables = self.tables.lock();
    let Some(order) = tables.orders.iter().find(|o| o.id == order_id) else {
      return Ok(None);
    };
    Ok(tables.customer(order.customer_id).map(|c| OrderWithCustomer {
      id: order.id,
      customer_id: c.id,
      customer_name: c.name.clone(),
      customer_email: c.email.clone(),
      payment_method: order.payment_method.clone(),
      status: order.status,
      total_price: order.total_price,
      created_at: order.created_at,
    }))
  }

  async fn order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
    Ok(
      self
        .tables
        .lock()
        .order_items
        .iter()
        .filter(|i| i.order_id == order_id)
        .cloned()
        .collect(),
    )
  }

  async fn order_item_details(&self, order_id: i64) -> Result<Vec<OrderItemDetail>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .order_items
        .iter()
        .filter(|i| i.order_id == order_id)
        .map(|i| OrderItemDetail {
          id: i.id,
          product_id: i.product_id,
          product_name: i.product_name.clone(),
          current_product_name: tables.product(i.product_id).map(|p| p.product_name.clone()),
          quantity: i.quantity,
          price: i.price,
          line_total: i.price * Decimal::from(i.quantity),
        })
        .collect(),
    )
  }

  async fn delete_orders(&self, ids: &[i64]) -> Result<u64> {
    let mut tables = self.tables.lock();
    tables.order_items.retain(|i| !ids.contains(&i.order_id));
    let before = tables.orders.len();
    tables.orders.retain(|o| !ids.contains(&o.id));
    Ok((before - tables.orders.len()) as u64)
  }

  async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<bool> {
    let mut tables = self.tables.lock();
    let Some(order) = tables.orders.iter_mut().find(|o| o.id == order_id) else {
      return Ok(false);
    };
    order.status = status;
    Ok(true)
  }
}

#[async_trait]
impl ContactStore for MemoryStore {
  async fn insert_contact(&self, draft: &ContactDraft) -> Result<i64> {
    let mut tables = self.tables.lock();
    let id = next(&mut tables.seq.contact);
    tables.contacts.push(Contact {
      id,
      vendor_name: draft.vendor_name.clone(),
      vendor_email: draft.vendor_email.clone(),
      vendor_phone: draft.vendor_phone.clone(),
      vendor_address: draft.vendor_address.clone(),
      vendor_note: draft.vendor_note.clone(),
      created_at: Utc::now(),
    });
    Ok(id)
  }

  async fn delete_contacts(&self, ids: &[i64]) -> Result<u64> {
    let mut tables = self.tables.lock();
    let before = tables.contacts.len();
    tables.contacts.retain(|c| !ids.contains(&c.id));
    Ok((before - tables.contacts.len()) as u64)
  }

  async fn list_contacts(&self) -> Result<Vec<Contact>> {
    Ok(self.tables.lock().contacts.clone())
  }
}

#[async_trait]
impl TagStore for MemoryStore {
  async fn list_tags(&self) -> Result<Vec<Tag>> {
    Ok(self.tables.lock().tags.clone())
  }
}

#[async_trait]
impl DashboardStore for MemoryStore {
  async fn total_revenue(&self) -> Result<Decimal> {
    let tables = self.tables.lock();
    Ok(
      tables
        .order_items
        .iter()
        .filter_map(|i| {
          tables
            .product(i.product_id)
            .map(|p| Decimal::from(i.quantity) * (i.price - p.price))
        })
        .sum(),
    )
  }

  async fn total_orders(&self) -> Result<i64> {
    Ok(self.tables.lock().orders.len() as i64)
  }

  async fn popular_products(&self, limit: i64) -> Result<Vec<PopularProduct>> {
    let tables = self.tables.lock();
    let mut sold: HashMap<i64, i64> = HashMap::new();
    for item in &tables.order_items {
      *sold.entry(item.product_id).or_default() += i64::from(item.quantity);
    }
    let mut rows: Vec<PopularProduct> = sold
      .into_iter()
      .filter_map(|(product_id, total_sold)| {
        tables.product(product_id).map(|p| PopularProduct {
          product_id,
          product_name: p.product_name.clone(),
          sale_price: p.sale_price,
          stock: p.stock,
          total_sold,
        })
      })
      .collect();
    rows.sort_by(|a, b| b.total_sold.cmp(&a.total_sold).then(a.product_id.cmp(&b.product_id)));
    rows.truncate(usize::try_from(limit).unwrap_or(0));
    Ok(rows)
  }

  async fn recent_orders(&self, limit: i64) -> Result<Vec<RecentOrder>> {
    let rows = self.list_orders().await?;
    Ok(
      rows
        .into_iter()
        .take(usize::try_from(limit).unwrap_or(0))
        .map(|o| RecentOrder {
          order_id: o.id,
          total_price: o.total_price,
          customer_name: o.customer_name,
        })
        .collect(),
    )
  }
}

#[async_trait]
impl Store for MemoryStore {
  fn backend_tag(&self) -> &'static str {
    "memory"
  }

  async fn ping(&self) -> Result<()> {
    if self.unhealthy.load(Ordering::SeqCst) {
      return Err(injected_failure("ping"));
    }
    Ok(())
  }

  async fn close(&self) {}
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn header(customer_id: i64) -> OrderHeader {
    OrderHeader {
      customer_id,
      payment_method: "card".into(),
      status: OrderStatus::Pending,
      total_price: dec!(10),
    }
  }

  #[tokio::test]
  async fn uncommitted_orders_are_invisible_and_discarded_on_rollback() {
    let store = MemoryStore::new();
    store.seed_customer_with_id(1, "Ada", "ada@example.com");
    let product_id = store.seed_product("Widget", dec!(5));

    let mut tx = store.begin_order().await.unwrap();
    let order_id = tx.insert_order_header(&header(1)).await.unwrap();
    let items = vec![ResolvedOrderItem {
      product_id,
      product_name: "Widget".into(),
      quantity: 2,
      price: dec!(5),
    }];
    tx.insert_order_items(order_id, &items).await.unwrap();
    assert!(store.orders().is_empty());

    tx.rollback().await.unwrap();
    assert!(store.orders().is_empty());
    assert!(store.all_order_items().is_empty());

    let mut tx = store.begin_order().await.unwrap();
    let second_id = tx.insert_order_header(&header(1)).await.unwrap();
    assert!(second_id > order_id, "sequence values are not reused");
    tx.commit().await.unwrap();
    assert_eq!(store.orders().len(), 1);
  }

  #[tokio::test]
  async fn header_insert_requires_a_known_customer() {
    let store = MemoryStore::new();
    let mut tx = store.begin_order().await.unwrap();
    assert!(matches!(tx.insert_order_header(&header(99)).await, Err(AppError::Sqlx(_))));
  }

  #[tokio::test]
  async fn revenue_uses_margin_over_current_product_price() {
    let store = MemoryStore::new();
    store.seed_customer_with_id(1, "Ada", "ada@example.com");
    let product_id = store.seed_product("Widget", dec!(15));
    let mut tx = store.begin_order().await.unwrap();
    let order_id = tx.insert_order_header(&header(1)).await.unwrap();
    let items = vec![ResolvedOrderItem {
      product_id,
      product_name: "Widget".into(),
      quantity: 3,
      price: dec!(20),
    }];
    tx.insert_order_items(order_id, &items).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(store.total_revenue().await.unwrap(), dec!(15));
    assert_eq!(store.total_orders().await.unwrap(), 1);
    let popular = store.popular_products(5).await.unwrap();
    assert_eq!(popular.len(), 1);
    assert_eq!(popular[0].total_sold, 3);
  }
}
