// dashboard/src/views.rs

//! Server-rendered pages. Templates are compiled into the binary.

use crate::errors::Result;
use chrono::DateTime;
use minijinja::{Environment, Value};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

const TEMPLATES: &[(&str, &str)] = &[
  ("layout.html", include_str!("../templates/layout.html")),
  ("index.html", include_str!("../templates/index.html")),
  ("products.html", include_str!("../templates/products.html")),
  ("customers.html", include_str!("../templates/customers.html")),
  ("orders.html", include_str!("../templates/orders.html")),
  ("order_details.html", include_str!("../templates/order_details.html")),
  ("invoice.html", include_str!("../templates/invoice.html")),
  ("contacts.html", include_str!("../templates/contacts.html")),
];

pub struct Views {
  env: Environment<'static>,
}

impl Views {
  pub fn new() -> Result<Self> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
      env.add_template(name, source)?;
    }
    env.add_filter("money", money);
    env.add_filter("datetime", datetime);
    Ok(Self { env })
  }

  pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
    let template = self.env.get_template(name)?;
    Ok(template.render(ctx)?)
  }
}

/// Two-decimal amount. Decimals reach templates as strings.
fn money(value: Value) -> Value {
  let raw = value.to_string();
  match Decimal::from_str(&raw) {
    Ok(amount) => Value::from_safe_string(format!("{:.2}", amount.round_dp(2))),
    Err(_) if value.is_none() || value.is_undefined() => Value::from_safe_string("0.00".to_string()),
    Err(_) => Value::from(raw),
  }
}

/// `dd/mm/yy HH:MM`, as the back-office has always shown timestamps.
fn datetime(value: Value) -> Value {
  let raw = value.to_string();
  match DateTime::parse_from_rfc3339(&raw) {
    Ok(ts) => Value::from_safe_string(ts.format("%d/%m/%y %H:%M").to_string()),
    Err(_) => Value::from(raw),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use rust_decimal_macros::dec;
  use serde_json::json;

  #[test]
  fn money_formats_decimals_and_numbers() {
    assert_eq!(money(Value::from_serialize(dec!(19.9))).to_string(), "19.90");
    assert_eq!(money(Value::from(5)).to_string(), "5.00");
    assert_eq!(money(Value::from(())).to_string(), "0.00");
  }

  #[test]
  fn datetime_uses_day_month_year() {
    let ts = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
    assert_eq!(datetime(Value::from_serialize(ts)).to_string(), "07/03/24 09:05");
  }

  #[test]
  fn every_template_compiles_and_escapes_input() {
    let views = Views::new().unwrap();
    let html = views
      .render(
        "contacts.html",
        json!({
          "title": "Contacts",
          "contacts": [{
            "id": 1, "vendor_name": "<b>Acme</b>", "vendor_email": "a@acme.test",
            "vendor_phone": "555", "vendor_address": null, "vendor_note": null,
            "created_at": "2024-03-07T09:05:00Z"
          }]
        }),
      )
      .unwrap();
    assert!(html.contains("&lt;b&gt;Acme&lt;&#x2f;b&gt;"));
    assert!(html.contains("07/03/24 09:05"));
  }
}
