// dashboard/src/services/mod.rs

pub mod image_storage;
pub mod order_resolver;
