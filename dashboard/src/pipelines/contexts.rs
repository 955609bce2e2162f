// dashboard/src/pipelines/contexts.rs

//! Data structs run through Orka pipelines. Handlers receive them wrapped in
//! `orka::ContextData`.

use crate::errors::{AppError, Result};
use crate::models::{NewOrder, ResolvedOrderItem};
use crate::state::AppState;
use crate::store::OrderTx;
use parking_lot::Mutex;
use std::sync::Arc;

/// Holder for the open order transaction.
///
/// The transaction is taken out for each use and put back afterwards, so no
/// lock is held while a query is awaited.
#[derive(Clone, Default)]
pub struct OrderTxSlot(Arc<Mutex<Option<Box<dyn OrderTx>>>>);

impl OrderTxSlot {
  pub fn put(&self, tx: Box<dyn OrderTx>) {
    *self.0.lock() = Some(tx);
  }

  pub fn take(&self) -> Result<Box<dyn OrderTx>> {
    self
      .0
      .lock()
      .take()
      .ok_or_else(|| AppError::Internal("No open order transaction".to_string()))
  }

  pub fn take_if_present(&self) -> Option<Box<dyn OrderTx>> {
    self.0.lock().take()
  }
}

#[derive(Clone)]
pub struct AddOrderCtxData {
  pub app_state: AppState,
  pub order: NewOrder,
  pub order_tx: OrderTxSlot,
  pub order_id: Option<i64>,
  pub resolved_items: Vec<ResolvedOrderItem>,
  pub items_persisted: u64,
  pub committed: bool,
  pub failed_step: Option<String>,
}

impl AddOrderCtxData {
  pub fn new(app_state: AppState, order: NewOrder) -> Self {
    Self {
      app_state,
      order,
      order_tx: OrderTxSlot::default(),
      order_id: None,
      resolved_items: Vec::new(),
      items_persisted: 0,
      committed: false,
      failed_step: None,
    }
  }
}
