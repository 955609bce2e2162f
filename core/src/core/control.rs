// core/src/core/control.rs

//! Flow-control signals returned by handlers and the outcome of a run.

/// Returned by a handler to let the run go on or halt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt now. No further handlers of this step or later steps run.
  Stop,
}

/// Outcome of a pipeline run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every non-skipped step ran to the end.
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}
