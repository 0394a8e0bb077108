// tests/common/mod.rs
#![allow(dead_code)]

use mealsaver_flow::{ContextData, FlowError, Handler, HandlerFuture, StepControl};
use once_cell::sync::Lazy;
use tracing::Level;

/// Context shared by the engine tests: records which steps ran.
#[derive(Clone, Debug, Default)]
pub struct TraceContext {
  pub tally: i32,
  pub visited: Vec<String>,
  pub stop_at: Option<String>,
  pub flag: bool,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("flow error: {0}")]
  Flow(String),

  #[error("handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(err: FlowError) -> Self {
    TestError::Flow(format!("{:?}", err))
  }
}

/// Handler that bumps the tally, records `step`, and stops if asked to.
pub fn recording_handler(step: &'static str) -> Handler<TraceContext, TestError> {
  Box::new(move |ctx: ContextData<TraceContext>| -> HandlerFuture<TestError> {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.tally += 1;
      guard.visited.push(step.to_string());
      if guard.stop_at.as_deref() == Some(step) {
        return Ok(StepControl::Stop);
      }
      Ok(StepControl::Continue)
    })
  })
}

pub fn failing_handler(step: &'static str, message: &'static str) -> Handler<TraceContext, TestError> {
  Box::new(move |ctx: ContextData<TraceContext>| -> HandlerFuture<TestError> {
    Box::pin(async move {
      ctx.write().visited.push(step.to_string());
      Err(TestError::Handler(message.to_string()))
    })
  })
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
