// core/src/pipeline/execution.rs

use crate::core::context_data::ContextData;
use crate::core::control::{FlowOutcome, StepControl};
use crate::core::handler::Handler;
use crate::error::FlowError;
use crate::pipeline::definition::ActionPipeline;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> ActionPipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// For each step: evaluate `skip_if`, then run the `before`, `on`, and
  /// `after` handlers. The first error or `Stop` ends the run.
  #[instrument(
    name = "ActionPipeline::run",
    skip_all,
    fields(pipeline = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Pipeline run starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(Level::INFO, "action_step", step = step_name, index = step_idx);

      if let Some(skip_cond) = &step_def.skip_if {
        if skip_cond(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let phases = [
        ("before", self.before.get(step_name)),
        ("on", self.on.get(step_name)),
        ("after", self.after.get(step_name)),
      ];

      let has_any_handler = phases.iter().any(|(_, hs)| hs.map_or(false, |v| !v.is_empty()));
      if !has_any_handler {
        if step_def.optional {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers.");
          continue;
        }
        event!(Level::ERROR, step = step_name, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase_name, handlers) in phases {
        if let Some(handlers) = handlers {
          let control = run_phase(phase_name, handlers, &ctx_data)
            .instrument(step_span.clone())
            .await?;
          if control == StepControl::Stop {
            event!(Level::INFO, step = step_name, phase = phase_name, "Pipeline stopped by a handler.");
            return Ok(FlowOutcome::Stopped);
          }
        }
      }
    }

    event!(Level::DEBUG, "Pipeline run completed.");
    Ok(FlowOutcome::Completed)
  }
}

async fn run_phase<TData, Err>(
  phase_name: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<StepControl, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for handler_fn in handlers {
    match handler_fn(ctx_data.clone()).await {
      Ok(StepControl::Continue) => {}
      Ok(StepControl::Stop) => return Ok(StepControl::Stop),
      Err(e) => {
        event!(Level::WARN, phase = phase_name, error = %e, "Step handler failed.");
        return Err(e);
      }
    }
  }
  Ok(StepControl::Continue)
}
