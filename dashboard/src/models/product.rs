// dashboard/src/models/product.rs

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub product_name: String,
  pub price: Decimal,
  pub sale_price: Option<Decimal>,
  pub stock: i32,
  pub tag_id: Option<i64>,
  pub image_path: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A product joined with its tag name, as shown on the products page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductListing {
  pub id: i64,
  pub product_name: String,
  pub price: Decimal,
  pub sale_price: Option<Decimal>,
  pub stock: i32,
  pub tag_id: Option<i64>,
  pub tag_name: Option<String>,
  pub image_path: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Option offered by the new-order form.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductChoice {
  pub id: i64,
  pub product_name: String,
  pub price: Decimal,
  pub sale_price: Option<Decimal>,
}

/// Body of `POST /api/add-product-details`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
  pub product_name: Option<String>,
  pub price: Option<Decimal>,
  pub sale_price: Option<Decimal>,
  pub stock: Option<i32>,
  pub tags: Option<i64>,
}

/// Body of `POST /api/update-product`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
  pub id: Option<i64>,
  pub product_name: Option<String>,
  pub price: Option<Decimal>,
  pub sale_price: Option<Decimal>,
  pub stock: Option<i32>,
  pub tags: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
  pub product_name: String,
  pub price: Decimal,
  pub sale_price: Option<Decimal>,
  pub stock: i32,
  pub tag_id: Option<i64>,
}

impl ProductInput {
  pub fn into_draft(self) -> Result<ProductDraft> {
    let product_name = super::required_text(self.product_name, "product_name")?;
    let price = self
      .price
      .ok_or_else(|| AppError::Validation("price is required".to_string()))?;
    if price.is_sign_negative() {
      return Err(AppError::Validation("price must not be negative".to_string()));
    }
    if self.sale_price.is_some_and(|p| p.is_sign_negative()) {
      return Err(AppError::Validation("sale_price must not be negative".to_string()));
    }
    let stock = self.stock.unwrap_or(0);
    if stock < 0 {
      return Err(AppError::Validation("stock must not be negative".to_string()));
    }
    Ok(ProductDraft {
      product_name,
      price,
      sale_price: self.sale_price,
      stock,
      tag_id: self.tags,
    })
  }
}

impl UpdateProductInput {
  pub fn into_parts(self) -> Result<(i64, ProductDraft)> {
    let id = self
      .id
      .ok_or_else(|| AppError::Validation("id is required".to_string()))?;
    let draft = ProductInput {
      product_name: self.product_name,
      price: self.price,
      sale_price: self.sale_price,
      stock: self.stock,
      tags: self.tags,
    }
    .into_draft()?;
    Ok((id, draft))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn product_input_accepts_numbers_and_strings_for_prices() {
    let input: ProductInput =
      serde_json::from_str(r#"{"product_name":"Widget","price":19.99,"sale_price":"17.50","stock":4,"tags":2}"#)
        .unwrap();
    let draft = input.into_draft().unwrap();
    assert_eq!(draft.price, dec!(19.99));
    assert_eq!(draft.sale_price, Some(dec!(17.50)));
    assert_eq!(draft.tag_id, Some(2));
  }

  #[test]
  fn product_input_requires_name_and_price() {
    let missing_name = ProductInput {
      price: Some(dec!(1)),
      ..Default::default()
    };
    assert!(matches!(missing_name.into_draft(), Err(AppError::Validation(_))));

    let missing_price = ProductInput {
      product_name: Some("Gadget".into()),
      ..Default::default()
    };
    assert!(matches!(missing_price.into_draft(), Err(AppError::Validation(_))));
  }

  #[test]
  fn update_requires_an_id() {
    let input = UpdateProductInput {
      product_name: Some("Gadget".into()),
      price: Some(dec!(2)),
      ..Default::default()
    };
    assert!(matches!(input.into_parts(), Err(AppError::Validation(ref m)) if m.contains("id")));
  }
}
