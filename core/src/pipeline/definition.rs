// core/src/pipeline/definition.rs

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;

/// An ordered set of named steps over context data `TData`, whose handlers
/// fail with `Err`.
///
/// `Err` must absorb [`FlowError`] so that machinery failures (a required
/// step without handlers) come back through the same channel as handler
/// failures.
pub struct ActionPipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> ActionPipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Builds a pipeline from its step definitions, in execution order.
  ///
  /// Panics on duplicate step names: that is a wiring mistake, not a runtime
  /// condition.
  pub fn new(name: impl Into<String>, steps: Vec<StepDef<TData>>) -> Self {
    for (idx, step) in steps.iter().enumerate() {
      if steps[..idx].iter().any(|s| s.name == step.name) {
        panic!("Pipeline setup error: step '{}' declared twice.", step.name);
      }
    }

    Self {
      name: name.into(),
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Pipeline setup error: step '{}' is not declared in pipeline '{}'.",
        step_name, self.name
      );
    }
  }

  /// Inserts a new step right after an existing one.
  pub fn insert_after_step(&mut self, existing_step: &str, step: StepDef<TData>) -> Result<(), FlowError> {
    let idx = self
      .steps
      .iter()
      .position(|s| s.name == existing_step)
      .ok_or_else(|| FlowError::StepNotFound {
        step_name: existing_step.to_string(),
      })?;
    if self.steps.iter().any(|s| s.name == step.name) {
      return Err(FlowError::Internal(format!(
        "step '{}' already exists in pipeline '{}'",
        step.name, self.name
      )));
    }
    self.steps.insert(idx + 1, step);
    Ok(())
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    self.ensure_step_exists(step_name);
    if let Some(step) = self.steps.iter_mut().find(|s| s.name == step_name) {
      step.skip_if = skip_if;
    }
  }
}
