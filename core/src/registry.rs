// core/src/registry.rs

//! `ActionRegistry<E>`: action pipelines keyed by their context data type.
//!
//! Each pipeline is registered under the `TypeId` of its context data, so a
//! caller dispatches simply by building the right context. Runs return the
//! application's error type `E`.

use crate::core::context_data::ContextData;
use crate::core::control::FlowOutcome;
use crate::error::FlowError;
use crate::pipeline::definition::ActionPipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedRunner<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  fn pipeline_name(&self) -> &str;

  /// `ctx_obj` holds a `ContextData<TData>` for the wrapped pipeline's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<FlowOutcome, AppErr>;
}

struct TypedRunner<TData, StepErr, AppErr>
where
  TData: 'static + Send + Sync,
  StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipeline: ActionPipeline<TData, StepErr>,
  _app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, StepErr, AppErr> ErasedRunner<AppErr> for TypedRunner<TData, StepErr, AppErr>
where
  TData: 'static + Send + Sync,
  StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<StepErr> + From<FlowError> + Send + Sync + 'static,
{
  fn pipeline_name(&self) -> &str {
    self.pipeline.name()
  }

  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<FlowOutcome, AppErr> {
    let ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Dispatched context has the wrong type.");
        return Err(AppErr::from(FlowError::ContextMismatch { expected_type }));
      }
    };
    self.pipeline.run(ctx_data).await.map_err(AppErr::from)
  }
}

/// Registry of action pipelines, one per context data type.
pub struct ActionRegistry<AppErr = FlowError>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  runners: RwLock<HashMap<TypeId, Arc<dyn ErasedRunner<AppErr>>>>,
}

impl<AppErr> Default for ActionRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<AppErr> ActionRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      runners: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for its context type, replacing any earlier one.
  pub fn register<TData, StepErr>(&self, pipeline: ActionPipeline<TData, StepErr>)
  where
    TData: 'static + Send + Sync,
    StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<StepErr>,
  {
    event!(
      Level::DEBUG,
      pipeline = %pipeline.name(),
      context_type = %std::any::type_name::<TData>(),
      "Registering action pipeline."
    );
    let runner = TypedRunner::<TData, StepErr, AppErr> {
      pipeline,
      _app_err: PhantomData,
    };
    let previous = self.runners.write().insert(TypeId::of::<TData>(), Arc::new(runner));
    if let Some(previous) = previous {
      event!(Level::WARN, replaced = %previous.pipeline_name(), "Action pipeline replaced.");
    }
  }

  pub fn is_registered<TData: 'static + Send + Sync>(&self) -> bool {
    self.runners.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData`.
  ///
  /// The caller keeps its own clone of `ctx_data` to read results afterwards.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.runners.read().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      let context_type = std::any::type_name::<TData>().to_string();
      event!(Level::ERROR, %context_type, "No action pipeline registered.");
      AppErr::from(FlowError::NotRegistered { context_type })
    })?;

    event!(Level::DEBUG, pipeline = %runner.pipeline_name(), "Dispatching action pipeline.");
    runner.run_erased(Box::new(ctx_data)).await
  }
}
