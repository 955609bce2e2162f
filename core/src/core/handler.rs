// core/src/core/handler.rs

//! Boxed handler types stored by a [`crate::Pipeline`].

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A step handler: takes a clone of the run's [`ContextData`] and resolves to
/// a [`PipelineControl`] or the pipeline's error type.
///
/// Handlers must release any lock guard before awaiting.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// A failure hook: runs once after a handler of the pipeline has failed,
/// receiving the context and the name of the step that failed.
///
/// Hooks cannot fail; whatever they need to report they log themselves.
pub type FailureHook<TData> =
  Box<dyn Fn(ContextData<TData>, String) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;
