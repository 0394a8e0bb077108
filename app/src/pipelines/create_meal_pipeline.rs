// app/src/pipelines/create_meal_pipeline.rs

use crate::errors::{AppError, Result};
use crate::models::MealSubmission;
use crate::pipelines::common_steps;
use crate::pipelines::contexts::CreateMealCtxData;
use crate::services::session::Session;
use crate::services::view_cache::InvalidationScope;
use crate::state::AppState;
use mealsaver_flow::{ActionPipeline, ActionRegistry, ContextData, FlowOutcome, StepControl, StepDef};
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const LISTING_PATH: &str = "/meals";
pub const HOME_PATH: &str = "/";

pub fn build_create_meal_pipeline() -> ActionPipeline<CreateMealCtxData, AppError> {
  let mut p = ActionPipeline::<CreateMealCtxData, AppError>::new(
    "create_meal",
    vec![
      StepDef::required("require_session"),
      StepDef::required("validate_meal_submission"),
      StepDef::required("persist_meal"),
      StepDef::required("invalidate_listing_views"),
    ],
  );

  p.on("require_session", common_steps::require_session::<CreateMealCtxData>);
  p.on("validate_meal_submission", validate_meal_submission);
  p.on("persist_meal", persist_meal);
  p.on("invalidate_listing_views", invalidate_listing_views);
  p
}

pub fn register_create_meal_pipeline(registry: &ActionRegistry<AppError>) {
  registry.register(build_create_meal_pipeline());
  tracing::info!("Create-meal pipeline registered.");
}

#[instrument(name = "create_meal::validate_submission", skip_all, err(Display))]
async fn validate_meal_submission(ctx_data: ContextData<CreateMealCtxData>) -> Result<StepControl> {
  let mut guard = ctx_data.write();
  let owner_id = guard.session.require_user()?.user_id.clone();
  let submission = guard
    .submission
    .take()
    .ok_or_else(|| AppError::Internal("meal submission already consumed".to_string()))?;

  let new_meal = submission.into_new_meal(&owner_id).map_err(|e| {
    warn!(error = %e, "Meal submission rejected.");
    e
  })?;
  guard.new_meal = Some(new_meal);
  Ok(StepControl::Continue)
}

#[instrument(name = "create_meal::persist_meal", skip_all, err(Display))]
async fn persist_meal(ctx_data: ContextData<CreateMealCtxData>) -> Result<StepControl> {
  let (gateway, new_meal) = {
    let mut guard = ctx_data.write();
    let new_meal = guard
      .new_meal
      .take()
      .ok_or_else(|| AppError::Internal("meal was not validated before persisting".to_string()))?;
    (guard.app_state.gateway.clone(), new_meal)
  };

  let meal = gateway.meals().insert_meal(new_meal).await?;
  info!(meal_id = %meal.id, owner_id = %meal.owner_id, "Meal created.");
  ctx_data.write().created_meal_id = Some(meal.id);
  Ok(StepControl::Continue)
}

async fn invalidate_listing_views(ctx_data: ContextData<CreateMealCtxData>) -> Result<StepControl> {
  let app_state = ctx_data.read().app_state.clone();
  common_steps::invalidate_views(
    &app_state,
    &[(LISTING_PATH, InvalidationScope::Layout), (HOME_PATH, InvalidationScope::Page)],
  );
  Ok(StepControl::Continue)
}

/// Persists a new meal owned by the session user and returns its id.
#[instrument(name = "action::create_meal", skip_all, err(Display))]
pub async fn create_meal(app_state: &AppState, session: Session, submission: MealSubmission) -> Result<Uuid> {
  let ctx_data = ContextData::new(CreateMealCtxData::new(app_state.clone(), session, submission));

  match app_state.actions.run(ctx_data.clone()).await? {
    FlowOutcome::Completed => {}
    // None of the registered steps stop, so a halt means the registry
    // holds a pipeline other than this one.
    FlowOutcome::Stopped => {
      return Err(AppError::Internal("meal creation was halted before finishing".to_string()));
    }
  }

  let created_meal_id = ctx_data.read().created_meal_id;
  created_meal_id.ok_or_else(|| AppError::Internal("meal creation finished without an id".to_string()))
}
