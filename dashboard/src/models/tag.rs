// dashboard/src/models/tag.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
  pub id: i64,
  pub tag_name: String,
}
