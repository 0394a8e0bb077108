// app/src/pipelines/send_message_pipeline.rs

use crate::errors::{AppError, Result};
use crate::models::{MessageSubmission, NewMessage};
use crate::pipelines::common_steps;
use crate::pipelines::contexts::SendMessageCtxData;
use crate::pipelines::toggle_read_pipeline::INBOX_PATH;
use crate::services::session::Session;
use crate::services::view_cache::InvalidationScope;
use crate::state::AppState;
use mealsaver_flow::{ActionPipeline, ActionRegistry, ContextData, FlowOutcome, StepControl, StepDef};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

pub fn build_send_message_pipeline() -> ActionPipeline<SendMessageCtxData, AppError> {
  let mut p = ActionPipeline::<SendMessageCtxData, AppError>::new(
    "send_message",
    vec![
      StepDef::required("require_session"),
      StepDef::required("load_meal"),
      StepDef::required("compose_message"),
      StepDef::required("persist_message"),
      StepDef::required("invalidate_message_views"),
    ],
  );

  p.on("require_session", common_steps::require_session::<SendMessageCtxData>);
  p.on("load_meal", load_meal);
  p.on("compose_message", compose_message);
  p.on("persist_message", persist_message);
  p.on("invalidate_message_views", invalidate_message_views);
  p
}

pub fn register_send_message_pipeline(registry: &ActionRegistry<AppError>) {
  registry.register(build_send_message_pipeline());
  tracing::info!("Send-message pipeline registered.");
}

#[instrument(name = "send_message::load_meal", skip_all, err(Display))]
async fn load_meal(ctx_data: ContextData<SendMessageCtxData>) -> Result<StepControl> {
  let (gateway, meal_id) = {
    let guard = ctx_data.read();
    (guard.app_state.gateway.clone(), guard.meal_id.clone())
  };

  let meal = gateway.meals().find_meal(&meal_id).await?.ok_or_else(|| {
    warn!(%meal_id, "Meal not found for message.");
    AppError::NotFound(format!("Meal {} not found.", meal_id))
  })?;

  ctx_data.write().meal = Some(meal);
  Ok(StepControl::Continue)
}

/// Validates the body, rejects messages to one's own listing and fills the
/// sender's contact details, falling back to the session profile.
#[instrument(name = "send_message::compose_message", skip_all, err(Display))]
async fn compose_message(ctx_data: ContextData<SendMessageCtxData>) -> Result<StepControl> {
  let mut guard = ctx_data.write();
  guard.submission.validate()?;

  let user = guard.session.require_user()?.clone();
  let (meal_id, recipient_id) = {
    let meal = guard
      .meal
      .as_ref()
      .ok_or_else(|| AppError::Internal("meal not loaded before composing".to_string()))?;
    (meal.id, meal.owner_id.clone())
  };

  if recipient_id == user.user_id {
    warn!(user_id = %user.user_id, %meal_id, "Sender tried to message their own listing.");
    return Err(AppError::Validation("You cannot send a message to yourself.".to_string()));
  }

  let submission = &guard.submission;
  let body = non_blank(submission.body.as_deref())
    .ok_or_else(|| AppError::Validation("message body is required".to_string()))?;
  let sender_name = non_blank(submission.name.as_deref())
    .or_else(|| non_blank(user.name.as_deref()))
    .ok_or_else(|| AppError::Validation("sender name is required".to_string()))?;
  let sender_email = non_blank(submission.email.as_deref())
    .or_else(|| non_blank(user.email.as_deref()))
    .ok_or_else(|| AppError::Validation("sender email is required".to_string()))?;
  let sender_phone = non_blank(submission.phone.as_deref());

  guard.new_message = Some(NewMessage {
    sender_id: user.user_id,
    recipient_id,
    meal_id,
    sender_name,
    sender_email,
    sender_phone,
    body,
  });
  Ok(StepControl::Continue)
}

#[instrument(name = "send_message::persist_message", skip_all, err(Display))]
async fn persist_message(ctx_data: ContextData<SendMessageCtxData>) -> Result<StepControl> {
  let (gateway, new_message) = {
    let mut guard = ctx_data.write();
    let new_message = guard
      .new_message
      .take()
      .ok_or_else(|| AppError::Internal("message was not composed before persisting".to_string()))?;
    (guard.app_state.gateway.clone(), new_message)
  };

  let message = gateway.messages().insert_message(new_message).await?;
  info!(message_id = %message.id, recipient_id = %message.recipient_id, "Message sent.");
  ctx_data.write().created_message_id = Some(message.id);
  Ok(StepControl::Continue)
}

async fn invalidate_message_views(ctx_data: ContextData<SendMessageCtxData>) -> Result<StepControl> {
  let app_state = ctx_data.read().app_state.clone();
  common_steps::invalidate_views(&app_state, &[(INBOX_PATH, InvalidationScope::Layout)]);
  Ok(StepControl::Continue)
}

fn non_blank(value: Option<&str>) -> Option<String> {
  value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Sends a message about `meal_id` to the meal's owner and returns its id.
#[instrument(name = "action::send_message", skip(app_state, session, submission), err(Display))]
pub async fn send_message(
  app_state: &AppState,
  session: Session,
  meal_id: &str,
  submission: MessageSubmission,
) -> Result<Uuid> {
  let ctx_data = ContextData::new(SendMessageCtxData::new(app_state.clone(), session, meal_id, submission));

  match app_state.actions.run(ctx_data.clone()).await? {
    FlowOutcome::Completed => {}
    // None of the registered steps stop, so a halt means the registry
    // holds a pipeline other than this one.
    FlowOutcome::Stopped => {
      return Err(AppError::Internal("message send was halted before finishing".to_string()));
    }
  }

  let created_message_id = ctx_data.read().created_message_id;
  created_message_id.ok_or_else(|| AppError::Internal("message send finished without an id".to_string()))
}
