// dashboard/src/models/contact.rs

use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Contact {
  pub id: i64,
  pub vendor_name: String,
  pub vendor_email: String,
  pub vendor_phone: String,
  pub vendor_address: Option<String>,
  pub vendor_note: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
  pub vendor_name: Option<String>,
  pub vendor_email: Option<String>,
  pub vendor_phone: Option<String>,
  pub vendor_address: Option<String>,
  pub vendor_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactDraft {
  pub vendor_name: String,
  pub vendor_email: String,
  pub vendor_phone: String,
  pub vendor_address: Option<String>,
  pub vendor_note: Option<String>,
}

impl ContactInput {
  pub fn into_draft(self) -> Result<ContactDraft> {
    Ok(ContactDraft {
      vendor_name: super::required_text(self.vendor_name, "vendor_name")?,
      vendor_email: super::required_text(self.vendor_email, "vendor_email")?,
      vendor_phone: super::required_text(self.vendor_phone, "vendor_phone")?,
      vendor_address: super::optional_text(self.vendor_address),
      vendor_note: super::optional_text(self.vendor_note),
    })
  }
}
