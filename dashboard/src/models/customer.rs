// dashboard/src/models/customer.rs

use crate::errors::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
  pub id: i64,
  pub name: String,
  pub email: String,
  pub created_at: DateTime<Utc>,
}

/// A customer with the aggregates shown on the customers page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerOverview {
  pub id: i64,
  pub name: String,
  pub email: String,
  pub created_at: DateTime<Utc>,
  pub order_count: i64,
  pub total_spent: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerChoice {
  pub id: i64,
  pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInput {
  pub name: Option<String>,
  pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
  pub name: String,
  pub email: String,
}

impl CustomerInput {
  pub fn into_draft(self) -> Result<CustomerDraft> {
    Ok(CustomerDraft {
      name: super::required_text(self.name, "name")?,
      email: super::required_text(self.email, "email")?,
    })
  }
}
