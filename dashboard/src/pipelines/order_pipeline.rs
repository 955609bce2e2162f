// dashboard/src/pipelines/order_pipeline.rs

//! Order submission: header insert, concurrent product-name resolution, one
//! bulk insert of the items, commit. Any failure rolls the transaction back.

use crate::errors::{AppError, Result};
use crate::models::NewOrder;
use crate::pipelines::contexts::AddOrderCtxData;
use crate::services::order_resolver;
use crate::state::AppState;
use crate::store::{OrderHeader, OrderStore};
use orka::{ContextData, Orka, Pipeline, PipelineControl, PipelineResult, SkipCondition};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub fn register_add_order_pipeline(orka_registry: &Arc<Orka<AppError>>, _app_state: &AppState) {
  let mut p = Pipeline::<AddOrderCtxData, AppError>::new(&[
    ("open_order_transaction", false, None),
    ("insert_order_header", false, None),
    ("resolve_order_items", false, None),
    ("insert_order_items", false, None),
    ("commit_order", false, None),
  ]);

  let no_items: SkipCondition<AddOrderCtxData> =
    Arc::new(|ctx_data: ContextData<AddOrderCtxData>| ctx_data.read().resolved_items.is_empty());
  p.set_skip_condition("insert_order_items", Some(no_items));

  p.on_root("open_order_transaction", |ctx_data: ContextData<AddOrderCtxData>| {
    Box::pin(async move {
      let (store, slot) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.order_tx.clone())
      };
      let tx = store.begin_order().await?;
      slot.put(tx);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("insert_order_header", |ctx_data: ContextData<AddOrderCtxData>| {
    Box::pin(async move {
      let (slot, header) = {
        let guard = ctx_data.read();
        let header = OrderHeader {
          customer_id: guard.order.customer_id,
          payment_method: guard.order.payment_method.clone(),
          status: guard.order.status,
          total_price: guard.order.total_price,
        };
        (guard.order_tx.clone(), header)
      };

      let mut tx = slot.take()?;
      let inserted = tx.insert_order_header(&header).await;
      slot.put(tx);
      let order_id = inserted?;

      ctx_data.write().order_id = Some(order_id);
      info!(order_id, customer_id = header.customer_id, "Order header inserted.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("resolve_order_items", |ctx_data: ContextData<AddOrderCtxData>| {
    Box::pin(async move {
      let (store, items, lookup_timeout) = {
        let guard = ctx_data.read();
        (
          guard.app_state.store.clone(),
          guard.order.items.clone(),
          guard.app_state.config.lookup_timeout,
        )
      };

      let resolved = order_resolver::resolve_order_items(store.as_ref(), &items, lookup_timeout).await?;
      ctx_data.write().resolved_items = resolved;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("insert_order_items", |ctx_data: ContextData<AddOrderCtxData>| {
    Box::pin(async move {
      let (slot, order_id, rows) = {
        let guard = ctx_data.read();
        let order_id = guard
          .order_id
          .ok_or_else(|| AppError::Internal("Order id missing before item insert".to_string()))?;
        (guard.order_tx.clone(), order_id, guard.resolved_items.clone())
      };

      let mut tx = slot.take()?;
      let inserted = tx.insert_order_items(order_id, &rows).await;
      slot.put(tx);
      let persisted = inserted?;

      ctx_data.write().items_persisted = persisted;
      info!(order_id, rows = persisted, "Order items inserted.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("commit_order", |ctx_data: ContextData<AddOrderCtxData>| {
    Box::pin(async move {
      let slot = ctx_data.read().order_tx.clone();
      slot.take()?.commit().await?;
      ctx_data.write().committed = true;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_failure(|ctx_data: ContextData<AddOrderCtxData>, failed_step: String| async move {
    let (slot, order_id) = {
      let mut guard = ctx_data.write();
      guard.failed_step = Some(failed_step.clone());
      (guard.order_tx.clone(), guard.order_id)
    };
    let Some(tx) = slot.take_if_present() else {
      return;
    };
    match tx.rollback().await {
      Ok(()) => warn!(step = %failed_step, ?order_id, "Order submission rolled back."),
      Err(e) => error!(step = %failed_step, ?order_id, error = %e, "Rolling back order submission failed."),
    }
  });

  orka_registry.register_pipeline(p);
}

/// Runs the order pipeline under the configured overall budget and returns
/// the id of the committed order.
#[instrument(
  name = "orders::submit_order",
  skip(app_state, order),
  fields(customer_id = order.customer_id, items = order.items.len())
)]
pub async fn submit_order(app_state: &AppState, order: NewOrder) -> Result<i64> {
  let ctx_data = ContextData::new(AddOrderCtxData::new(app_state.clone(), order));
  let budget = app_state.config.order_timeout;

  let outcome = tokio::time::timeout(budget, app_state.orka_instance.run(ctx_data.clone())).await;
  match outcome {
    Ok(Ok(PipelineResult::Completed)) => {
      let guard = ctx_data.read();
      match (guard.order_id, guard.committed) {
        (Some(order_id), true) => {
          info!(order_id, items = guard.items_persisted, "Order submitted.");
          Ok(order_id)
        }
        _ => Err(AppError::Internal("Order pipeline completed without committing".to_string())),
      }
    }
    Ok(Ok(PipelineResult::Stopped)) => Err(AppError::Internal("Order submission was halted".to_string())),
    Ok(Err(e)) => {
      let failed_step = ctx_data.read().failed_step.clone();
      warn!(error = %e, ?failed_step, "Order submission failed.");
      Err(e)
    }
    Err(_) => {
      let leftover = ctx_data.read().order_tx.take_if_present();
      if let Some(tx) = leftover {
        if let Err(e) = tx.rollback().await {
          error!(error = %e, "Rolling back timed-out order submission failed.");
        }
      }
      warn!(budget_ms = budget.as_millis() as u64, "Order submission timed out.");
      Err(AppError::Timeout(format!(
        "Order submission exceeded {}ms",
        budget.as_millis()
      )))
    }
  }
}
