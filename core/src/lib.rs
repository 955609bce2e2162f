// core/src/lib.rs

//! Orka: an asynchronous, type-safe workflow engine.
//!
//! A [`Pipeline`] is an ordered list of named steps run against one shared
//! [`ContextData`]. Each step can carry `before`, `on` and `after` handlers and
//! an optional skip condition. Handlers return [`PipelineControl`] to continue
//! or halt the run. When a handler fails, the pipeline's failure hooks run once
//! (for compensation such as rolling back a transaction) before the error is
//! returned.
//!
//! The [`Orka`] registry stores pipelines keyed by their context data type, so
//! callers only need a context value to dispatch the matching workflow.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::{FailureHook, Handler};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{OrkaError, OrkaResult};

pub use crate::registry::Orka;
