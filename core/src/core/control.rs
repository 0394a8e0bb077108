// core/src/core/control.rs

//! Signals a step handler returns, and the outcome of a whole run.

/// What a handler wants the pipeline to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Run the remaining handlers of this step, then the following steps.
  Continue,
  /// Halt immediately. Nothing after this handler runs.
  Stop,
}

/// How a pipeline run ended when no handler returned an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step either ran or was skipped.
  Completed,
  /// A handler returned [`StepControl::Stop`].
  Stopped,
}

impl FlowOutcome {
  pub fn is_completed(self) -> bool {
    matches!(self, FlowOutcome::Completed)
  }
}
