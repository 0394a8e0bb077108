// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use mealsaver_flow::{ActionPipeline, ContextData, FlowError, FlowOutcome, StepControl, StepDef};
use serial_test::serial;

fn three_step_pipeline() -> ActionPipeline<TraceContext, TestError> {
  let mut pipeline = ActionPipeline::new(
    "three_steps",
    vec![
      StepDef::required("first"),
      StepDef::required("second"),
      StepDef::required("third"),
    ],
  );
  pipeline.on("first", recording_handler("first"));
  pipeline.on("second", recording_handler("second"));
  pipeline.on("third", recording_handler("third"));
  pipeline
}

#[tokio::test]
#[serial]
async fn steps_run_in_declared_order() {
  setup_tracing();
  let pipeline = three_step_pipeline();
  assert_eq!(pipeline.step_names(), vec!["first", "second", "third"]);

  let ctx = ContextData::new(TraceContext::default());
  let outcome = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.tally, 3);
  assert_eq!(guard.visited, vec!["first", "second", "third"]);
}

#[tokio::test]
#[serial]
async fn stop_halts_remaining_steps() {
  setup_tracing();
  let pipeline = three_step_pipeline();
  let ctx = ContextData::new(TraceContext {
    stop_at: Some("second".to_string()),
    ..Default::default()
  });

  let outcome = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Stopped);
  assert!(!outcome.is_completed());
  assert_eq!(ctx.read().visited, vec!["first", "second"]);
}

#[tokio::test]
#[serial]
async fn map_read_narrows_to_one_field() {
  setup_tracing();
  let pipeline = three_step_pipeline();
  let ctx = ContextData::new(TraceContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  let visited = ctx.map_read(|data| data.visited.as_slice());
  assert_eq!(visited.len(), 3);
  assert_eq!(visited[2], "third");
  drop(visited);

  // The narrowed guard is released, so writers are not blocked.
  ctx.write().tally = 0;
  assert_eq!(*ctx.map_read(|data| &data.tally), 0);
}

#[tokio::test]
#[serial]
async fn handler_error_aborts_the_run() {
  setup_tracing();
  let mut pipeline = ActionPipeline::<TraceContext, TestError>::new(
    "failing",
    vec![StepDef::required("ok"), StepDef::required("bad"), StepDef::required("never")],
  );
  pipeline.on("ok", recording_handler("ok"));
  pipeline.on("bad", failing_handler("bad", "boom"));
  pipeline.on("never", recording_handler("never"));

  let ctx = ContextData::new(TraceContext::default());
  let err = pipeline.run(ctx.clone()).await.unwrap_err();

  assert_eq!(err, TestError::Handler("boom".to_string()));
  assert_eq!(ctx.read().visited, vec!["ok", "bad"]);
}

#[tokio::test]
#[serial]
async fn before_on_after_run_in_phase_order() {
  setup_tracing();
  let mut pipeline = ActionPipeline::<TraceContext, TestError>::new("phases", vec![StepDef::required("only")]);
  pipeline.after("only", recording_handler("after"));
  pipeline.on("only", recording_handler("on"));
  pipeline.before("only", recording_handler("before"));

  let ctx = ContextData::new(TraceContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().visited, vec!["before", "on", "after"]);
}

#[tokio::test]
#[serial]
async fn skip_condition_bypasses_step() {
  setup_tracing();
  let mut pipeline = ActionPipeline::<TraceContext, TestError>::new(
    "skipping",
    vec![
      StepDef::required("always"),
      StepDef::required("flagged").skip_if(|ctx: ContextData<TraceContext>| ctx.read().flag),
    ],
  );
  pipeline.on("always", recording_handler("always"));
  pipeline.on("flagged", recording_handler("flagged"));

  let ctx = ContextData::new(TraceContext {
    flag: true,
    ..Default::default()
  });
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().visited, vec!["always"]);

  pipeline.set_skip_condition("flagged", None);
  let ctx = ContextData::new(TraceContext {
    flag: true,
    ..Default::default()
  });
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().visited, vec!["always", "flagged"]);
}

#[tokio::test]
#[serial]
async fn optional_step_without_handlers_is_passed_over() {
  setup_tracing();
  let mut pipeline = ActionPipeline::<TraceContext, TestError>::new(
    "optional",
    vec![StepDef::required("work"), StepDef::optional("notify")],
  );
  pipeline.on("work", recording_handler("work"));

  let ctx = ContextData::new(TraceContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().visited, vec!["work"]);
}

#[tokio::test]
#[serial]
async fn inserted_step_runs_after_its_anchor() {
  setup_tracing();
  let mut pipeline = three_step_pipeline();
  pipeline.insert_after_step("first", StepDef::required("extra")).unwrap();
  pipeline.on("extra", recording_handler("extra"));

  let ctx = ContextData::new(TraceContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().visited, vec!["first", "extra", "second", "third"]);

  let missing = pipeline.insert_after_step("nope", StepDef::required("x"));
  assert!(matches!(missing, Err(FlowError::StepNotFound { .. })));
}

#[tokio::test]
#[serial]
async fn context_changes_are_visible_to_later_steps() {
  setup_tracing();
  let mut pipeline = ActionPipeline::<TraceContext, TestError>::new(
    "shared",
    vec![StepDef::required("write"), StepDef::required("read")],
  );
  pipeline.on("write", |ctx: ContextData<TraceContext>| async move {
    ctx.write().tally = 41;
    Ok::<_, TestError>(StepControl::Continue)
  });
  pipeline.on("read", |ctx: ContextData<TraceContext>| async move {
    let mut guard = ctx.write();
    assert_eq!(guard.tally, 41);
    guard.tally += 1;
    Ok::<_, TestError>(StepControl::Continue)
  });

  let ctx = ContextData::new(TraceContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().tally, 42);

  let inner = ctx.try_into_inner().expect("no other clones remain");
  assert_eq!(inner.tally, 42);
}
