// dashboard/src/services/order_resolver.rs

//! Product-name lookups for order line items.

use crate::errors::{AppError, Result};
use crate::models::{LineItem, ResolvedOrderItem};
use crate::store::ProductStore;
use futures_util::future::try_join_all;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Current display name of `product_id`, bounded by `timeout`.
pub async fn lookup_product_name<S>(store: &S, product_id: i64, timeout: Duration) -> Result<String>
where
  S: ProductStore + ?Sized,
{
  match tokio::time::timeout(timeout, store.product_name(product_id)).await {
    Ok(Ok(Some(name))) => Ok(name),
    Ok(Ok(None)) => {
      warn!(product_id, "Product not found during lookup.");
      Err(AppError::NotFound(format!("Product {} not found", product_id)))
    }
    Ok(Err(e)) => Err(e),
    Err(_) => {
      warn!(product_id, timeout_ms = timeout.as_millis() as u64, "Product lookup timed out.");
      Err(AppError::Timeout(format!(
        "Lookup of product {} exceeded {}ms",
        product_id,
        timeout.as_millis()
      )))
    }
  }
}

/// Looks up every line item's product name concurrently and returns the
/// resolved rows in input order.
///
/// All lookups start at once. The first failure wins and the remaining
/// lookups are dropped. An empty list resolves without touching the store.
#[instrument(name = "order_resolver::resolve_order_items", skip(store, items), fields(items = items.len()))]
pub async fn resolve_order_items<S>(
  store: &S,
  items: &[LineItem],
  lookup_timeout: Duration,
) -> Result<Vec<ResolvedOrderItem>>
where
  S: ProductStore + ?Sized,
{
  if items.is_empty() {
    return Ok(Vec::new());
  }

  let lookups = items.iter().map(|item| async move {
    let product_name = lookup_product_name(store, item.product_id, lookup_timeout).await?;
    Ok::<_, AppError>(ResolvedOrderItem {
      product_id: item.product_id,
      product_name,
      quantity: item.quantity,
      price: item.price,
    })
  });

  let resolved = try_join_all(lookups).await?;
  debug!(resolved = resolved.len(), "All line items resolved.");
  Ok(resolved)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::MemoryStore;
  use rust_decimal_macros::dec;
  use std::time::Instant;

  fn line(product_id: i64, quantity: i32) -> LineItem {
    LineItem {
      product_id,
      quantity,
      price: dec!(19.99),
    }
  }

  #[tokio::test]
  async fn empty_list_resolves_without_lookups() {
    let store = MemoryStore::new();
    let resolved = resolve_order_items(&store, &[], Duration::from_secs(1)).await.unwrap();
    assert!(resolved.is_empty());
    assert_eq!(store.lookup_calls(), 0);
  }

  #[tokio::test]
  async fn results_keep_input_order_when_lookups_finish_in_reverse() {
    let store = MemoryStore::new();
    store.seed_product_with_id(3, "Widget", dec!(10));
    store.seed_product_with_id(5, "Gadget", dec!(12));
    store.set_lookup_delay(3, Duration::from_millis(60));
    store.set_lookup_delay(5, Duration::from_millis(5));

    let resolved = resolve_order_items(&store, &[line(3, 2), line(5, 1)], Duration::from_secs(1))
      .await
      .unwrap();
    let names: Vec<&str> = resolved.iter().map(|r| r.product_name.as_str()).collect();
    assert_eq!(names, vec!["Widget", "Gadget"]);
    assert_eq!(resolved[0].quantity, 2);
  }

  #[tokio::test]
  async fn lookups_run_concurrently() {
    let store = MemoryStore::new();
    let items: Vec<LineItem> = (1..=4)
      .map(|id| {
        store.seed_product_with_id(id, &format!("P{}", id), dec!(1));
        store.set_lookup_delay(id, Duration::from_millis(80));
        line(id, 1)
      })
      .collect();

    let started = Instant::now();
    resolve_order_items(&store, &items, Duration::from_secs(2)).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(300), "lookups were serialized");
    assert_eq!(store.lookup_calls(), 4);
  }

  #[tokio::test]
  async fn missing_product_is_not_found() {
    let store = MemoryStore::new();
    store.seed_product_with_id(3, "Widget", dec!(10));
    let err = resolve_order_items(&store, &[line(3, 1), line(5, 1)], Duration::from_secs(1))
      .await
      .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Product 5 not found"));
  }

  #[tokio::test]
  async fn slow_lookup_is_a_timeout_not_a_not_found() {
    let store = MemoryStore::new();
    store.seed_product_with_id(3, "Widget", dec!(10));
    store.set_lookup_delay(3, Duration::from_millis(200));
    let err = lookup_product_name(&store, 3, Duration::from_millis(20)).await.unwrap_err();
    assert!(matches!(err, AppError::Timeout(_)));
  }
}
