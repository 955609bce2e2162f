// dashboard/src/web/handlers/mod.rs

pub mod contact_handlers;
pub mod customer_handlers;
pub mod order_handlers;
pub mod page_handlers;
pub mod product_handlers;
pub mod tag_handlers;

use serde::Deserialize;

/// Body of the bulk delete endpoints: `{"ids": [..]}`.
#[derive(Deserialize, Debug)]
pub struct IdsPayload {
  pub ids: Option<Vec<i64>>,
}
