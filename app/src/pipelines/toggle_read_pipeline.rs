// app/src/pipelines/toggle_read_pipeline.rs

use crate::errors::{AppError, Result};
use crate::pipelines::common_steps;
use crate::pipelines::contexts::ToggleReadCtxData;
use crate::services::session::Session;
use crate::services::view_cache::InvalidationScope;
use crate::state::AppState;
use mealsaver_flow::{ActionPipeline, ActionRegistry, ContextData, FlowOutcome, StepControl, StepDef};
use tracing::{info, instrument, warn};

pub const INBOX_PATH: &str = "/messages";

pub fn build_toggle_read_pipeline() -> ActionPipeline<ToggleReadCtxData, AppError> {
  let mut p = ActionPipeline::<ToggleReadCtxData, AppError>::new(
    "toggle_message_read",
    vec![
      StepDef::required("require_session"),
      StepDef::required("load_message"),
      StepDef::required("authorize_recipient"),
      StepDef::required("flip_read_flag"),
      StepDef::required("invalidate_message_views"),
    ],
  );

  p.on("require_session", common_steps::require_session::<ToggleReadCtxData>);
  p.on("load_message", load_message);
  p.on("authorize_recipient", authorize_recipient);
  p.on("flip_read_flag", flip_read_flag);
  p.on("invalidate_message_views", invalidate_message_views);
  p
}

pub fn register_toggle_read_pipeline(registry: &ActionRegistry<AppError>) {
  registry.register(build_toggle_read_pipeline());
  tracing::info!("Toggle-read pipeline registered.");
}

#[instrument(name = "toggle_read::load_message", skip_all, err(Display))]
async fn load_message(ctx_data: ContextData<ToggleReadCtxData>) -> Result<StepControl> {
  let (gateway, message_id) = {
    let guard = ctx_data.read();
    (guard.app_state.gateway.clone(), guard.message_id.clone())
  };

  let message = gateway.messages().find_message(&message_id).await?.ok_or_else(|| {
    warn!(%message_id, "Message not found.");
    AppError::NotFound(format!("Message {} not found.", message_id))
  })?;

  ctx_data.write().message = Some(message);
  Ok(StepControl::Continue)
}

#[instrument(name = "toggle_read::authorize_recipient", skip_all, err(Display))]
async fn authorize_recipient(ctx_data: ContextData<ToggleReadCtxData>) -> Result<StepControl> {
  let guard = ctx_data.read();
  let user = guard.session.require_user()?;
  let message = guard
    .message
    .as_ref()
    .ok_or_else(|| AppError::Internal("message not loaded before authorization".to_string()))?;

  if message.recipient_id != user.user_id {
    warn!(user_id = %user.user_id, message_id = %message.id, "Caller is not the recipient.");
    return Err(AppError::Unauthorized(
      "You are not authorized to update this message.".to_string(),
    ));
  }
  Ok(StepControl::Continue)
}

#[instrument(name = "toggle_read::flip_read_flag", skip_all, err(Display))]
async fn flip_read_flag(ctx_data: ContextData<ToggleReadCtxData>) -> Result<StepControl> {
  let (gateway, mut message) = {
    let guard = ctx_data.read();
    let message = guard
      .message
      .clone()
      .ok_or_else(|| AppError::Internal("message not loaded before toggle".to_string()))?;
    (guard.app_state.gateway.clone(), message)
  };

  message.read = !message.read;
  gateway.messages().save_message(&message).await?;
  info!(message_id = %message.id, read = message.read, "Message read flag toggled.");

  let mut guard = ctx_data.write();
  guard.new_read_state = Some(message.read);
  guard.message = Some(message);
  Ok(StepControl::Continue)
}

async fn invalidate_message_views(ctx_data: ContextData<ToggleReadCtxData>) -> Result<StepControl> {
  let app_state = ctx_data.read().app_state.clone();
  common_steps::invalidate_views(&app_state, &[(INBOX_PATH, InvalidationScope::Layout)]);
  Ok(StepControl::Continue)
}

/// Flips the read flag of `message_id` on behalf of its recipient and
/// returns the new value.
#[instrument(name = "action::toggle_message_read", skip(app_state, session), err(Display))]
pub async fn toggle_message_read(app_state: &AppState, session: Session, message_id: &str) -> Result<bool> {
  let ctx_data = ContextData::new(ToggleReadCtxData::new(app_state.clone(), session, message_id));

  match app_state.actions.run(ctx_data.clone()).await? {
    FlowOutcome::Completed => {}
    // None of the registered steps stop, so a halt means the registry
    // holds a pipeline other than this one.
    FlowOutcome::Stopped => {
      return Err(AppError::Internal("read toggle was halted before finishing".to_string()));
    }
  }

  let new_read_state = ctx_data.read().new_read_state;
  new_read_state.ok_or_else(|| AppError::Internal("toggle finished without a read state".to_string()))
}
