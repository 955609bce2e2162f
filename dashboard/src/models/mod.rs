// dashboard/src/models/mod.rs

//! Rows read from the store and the validated inputs written to it.

pub mod contact;
pub mod customer;
pub mod dashboard;
pub mod order;
pub mod order_item;
pub mod product;
pub mod tag;

pub use contact::{Contact, ContactDraft, ContactInput};
pub use customer::{Customer, CustomerChoice, CustomerDraft, CustomerInput, CustomerOverview};
pub use dashboard::{DashboardSummary, PopularProduct, RecentOrder};
pub use order::{AddOrderRequest, LineItem, NewOrder, Order, OrderStatus, OrderSummary, OrderWithCustomer};
pub use order_item::{OrderItem, OrderItemDetail, ResolvedOrderItem};
pub use product::{Product, ProductChoice, ProductDraft, ProductInput, ProductListing, UpdateProductInput};
pub use tag::Tag;

use crate::errors::{AppError, Result};

/// Rejects a missing or blank text field.
pub(crate) fn required_text(value: Option<String>, field: &str) -> Result<String> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
    _ => Err(AppError::Validation(format!("{} is required", field))),
  }
}

/// Blank optional text is stored as NULL.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Rejects a missing or empty id list used by the bulk delete endpoints.
pub fn require_ids(ids: Option<Vec<i64>>, what: &str) -> Result<Vec<i64>> {
  match ids {
    Some(ids) if !ids.is_empty() => Ok(ids),
    _ => Err(AppError::Validation(format!("No {} IDs provided", what))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_required_text_is_rejected() {
    assert!(required_text(Some("  ".into()), "name").is_err());
    assert!(required_text(None, "name").is_err());
    assert_eq!(required_text(Some(" Widget ".into()), "name").unwrap(), "Widget");
  }

  #[test]
  fn empty_id_lists_are_rejected() {
    let err = require_ids(Some(vec![]), "product").unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "No product IDs provided"));
    assert!(require_ids(None, "order").is_err());
    assert_eq!(require_ids(Some(vec![3, 4]), "order").unwrap(), vec![3, 4]);
  }
}
