// tests/registry_tests.rs
mod common;

use common::*;
use mealsaver_flow::{ActionPipeline, ActionRegistry, ContextData, FlowOutcome, StepControl, StepDef};

#[derive(Clone, Debug, Default)]
struct AlphaCtx {
  val: String,
}

#[derive(Clone, Debug, Default)]
struct BetaCtx {
  num: i32,
}

#[tokio::test]
async fn dispatches_by_context_type() {
  setup_tracing();
  let registry = ActionRegistry::<TestError>::new();

  let mut alpha = ActionPipeline::<AlphaCtx, TestError>::new("alpha", vec![StepDef::required("task")]);
  alpha.on("task", |ctx: ContextData<AlphaCtx>| async move {
    ctx.write().val = "alpha ran".to_string();
    Ok::<_, TestError>(StepControl::Continue)
  });
  registry.register(alpha);

  let mut beta = ActionPipeline::<BetaCtx, TestError>::new("beta", vec![StepDef::required("task")]);
  beta.on("task", |ctx: ContextData<BetaCtx>| async move {
    ctx.write().num = 100;
    Ok::<_, TestError>(StepControl::Continue)
  });
  registry.register(beta);

  assert!(registry.is_registered::<AlphaCtx>());
  assert!(registry.is_registered::<BetaCtx>());

  let alpha_ctx = ContextData::new(AlphaCtx::default());
  assert_eq!(registry.run(alpha_ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(alpha_ctx.read().val, "alpha ran");

  let beta_ctx = ContextData::new(BetaCtx::default());
  assert_eq!(registry.run(beta_ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(beta_ctx.read().num, 100);
}

#[tokio::test]
async fn unregistered_context_is_an_error() {
  setup_tracing();
  let registry = ActionRegistry::<TestError>::new();
  let err = registry.run(ContextData::new(AlphaCtx::default())).await.unwrap_err();
  match err {
    TestError::Flow(s) => assert!(s.contains("NotRegistered")),
    other => panic!("expected NotRegistered, got {:?}", other),
  }
}

#[tokio::test]
async fn handler_errors_pass_through_the_registry() {
  setup_tracing();
  let registry = ActionRegistry::<TestError>::new();
  let mut pipeline = ActionPipeline::<TraceContext, TestError>::new("fails", vec![StepDef::required("bad")]);
  pipeline.on("bad", failing_handler("bad", "denied"));
  registry.register(pipeline);

  let err = registry.run(ContextData::new(TraceContext::default())).await.unwrap_err();
  assert_eq!(err, TestError::Handler("denied".to_string()));
}

#[tokio::test]
async fn later_registration_replaces_earlier() {
  setup_tracing();
  let registry = ActionRegistry::<TestError>::new();

  let mut first = ActionPipeline::<AlphaCtx, TestError>::new("first", vec![StepDef::required("task")]);
  first.on("task", |ctx: ContextData<AlphaCtx>| async move {
    ctx.write().val = "first".to_string();
    Ok::<_, TestError>(StepControl::Continue)
  });
  registry.register(first);

  let mut second = ActionPipeline::<AlphaCtx, TestError>::new("second", vec![StepDef::required("task")]);
  second.on("task", |ctx: ContextData<AlphaCtx>| async move {
    ctx.write().val = "second".to_string();
    Ok::<_, TestError>(StepControl::Continue)
  });
  registry.register(second);

  let ctx = ContextData::new(AlphaCtx::default());
  registry.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().val, "second");
}
