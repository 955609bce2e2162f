// core/src/pipeline/execution.rs

//! `Pipeline::run()`: walks the steps, runs each phase's handlers and fires
//! the failure hooks when a handler errors.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::handler::Handler;
use crate::error::OrkaError;
use crate::pipeline::definition::Pipeline;
use std::collections::HashMap;
use tracing::{event, instrument, span, Instrument, Level};

/// How one phase of one step ended.
enum PhaseOutcome<Err> {
  Continue,
  Stopped,
  Failed(Err),
}

/// Error raised while walking the steps, tagged with the step it came from.
struct StepFailure<Err> {
  step_name: String,
  error: Err,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<OrkaError> + Send + Sync + 'static,
{
  /// Runs the pipeline against `ctx_data`.
  ///
  /// Returns `Completed` or `Stopped` on success. On the first handler error
  /// (or a required step without handlers) the failure hooks run once and the
  /// error is returned; no later handler runs.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    match self.run_steps(&ctx_data).await {
      Ok(result) => {
        event!(Level::DEBUG, ?result, "Pipeline execution finished.");
        Ok(result)
      }
      Err(StepFailure { step_name, error }) => {
        event!(Level::WARN, %step_name, error = %error, "Pipeline failed; running failure hooks.");
        for hook in &self.failure_hooks {
          hook(ctx_data.clone(), step_name.clone()).await;
        }
        Err(error)
      }
    }
  }

  async fn run_steps(&self, ctx_data: &ContextData<TData>) -> Result<PipelineResult, StepFailure<Err>> {
    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          step_span.in_scope(|| event!(Level::INFO, "Step skipped due to 'skip_if' condition."));
          continue;
        }
      }

      let has_handlers = [&self.before, &self.on, &self.after]
        .iter()
        .any(|phase| phase.get(step_name).is_some_and(|handlers| !handlers.is_empty()));

      if !has_handlers {
        if step_def.optional {
          step_span.in_scope(|| event!(Level::DEBUG, "Optional step has no handlers, skipping."));
          continue;
        }
        step_span.in_scope(|| event!(Level::ERROR, "Non-optional step has no handlers."));
        return Err(StepFailure {
          step_name: step_def.name.clone(),
          error: Err::from(OrkaError::HandlerMissing {
            step_name: step_def.name.clone(),
          }),
        });
      }

      for (phase_name, phase) in [("before", &self.before), ("on", &self.on), ("after", &self.after)] {
        let outcome = Self::run_phase(phase, phase_name, step_name, ctx_data)
          .instrument(step_span.clone())
          .await;
        match outcome {
          PhaseOutcome::Continue => {}
          PhaseOutcome::Stopped => return Ok(PipelineResult::Stopped),
          PhaseOutcome::Failed(error) => {
            return Err(StepFailure {
              step_name: step_def.name.clone(),
              error,
            })
          }
        }
      }
      step_span.in_scope(|| event!(Level::DEBUG, "Step processing finished successfully."));
    }

    Ok(PipelineResult::Completed)
  }

  async fn run_phase(
    phase: &HashMap<String, Vec<Handler<TData, Err>>>,
    phase_name: &'static str,
    step_name: &str,
    ctx_data: &ContextData<TData>,
  ) -> PhaseOutcome<Err> {
    let Some(handlers) = phase.get(step_name) else {
      return PhaseOutcome::Continue;
    };

    for (handler_idx, handler_fn) in handlers.iter().enumerate() {
      let handler_span = span!(Level::DEBUG, "step_handler", phase = phase_name, handler_index = handler_idx);
      match handler_fn(ctx_data.clone()).instrument(handler_span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, phase = phase_name, "Pipeline stopped by a handler.");
          return PhaseOutcome::Stopped;
        }
        Err(e) => {
          event!(Level::ERROR, phase = phase_name, error = %e, "Handler failed.");
          return PhaseOutcome::Failed(e);
        }
      }
    }
    PhaseOutcome::Continue
  }
}
