// app/src/pipelines/contexts.rs

//! Context data of each action pipeline. Handlers receive these wrapped in
//! `mealsaver_flow::ContextData`.

use crate::models::{Meal, MealSubmission, Message, MessageSubmission, NewMeal, NewMessage};
use crate::services::session::Session;
use crate::state::AppState;
use uuid::Uuid;

/// Access shared by the steps every action runs.
pub trait ActionContext: Send + Sync + 'static {
  fn app_state(&self) -> &AppState;
  fn session(&self) -> &Session;
}

macro_rules! impl_action_context {
  ($($ctx:ty),+ $(,)?) => {
    $(
      impl ActionContext for $ctx {
        fn app_state(&self) -> &AppState {
          &self.app_state
        }

        fn session(&self) -> &Session {
          &self.session
        }
      }
    )+
  };
}

impl_action_context!(ToggleReadCtxData, CreateMealCtxData, SendMessageCtxData);

#[derive(Clone)]
pub struct ToggleReadCtxData {
  pub app_state: AppState,
  pub session: Session,
  pub message_id: String,
  pub message: Option<Message>,
  pub new_read_state: Option<bool>,
}

impl ToggleReadCtxData {
  pub fn new(app_state: AppState, session: Session, message_id: impl Into<String>) -> Self {
    Self {
      app_state,
      session,
      message_id: message_id.into(),
      message: None,
      new_read_state: None,
    }
  }
}

#[derive(Clone)]
pub struct CreateMealCtxData {
  pub app_state: AppState,
  pub session: Session,
  pub submission: Option<MealSubmission>,
  pub new_meal: Option<NewMeal>,
  pub created_meal_id: Option<Uuid>,
}

impl CreateMealCtxData {
  pub fn new(app_state: AppState, session: Session, submission: MealSubmission) -> Self {
    Self {
      app_state,
      session,
      submission: Some(submission),
      new_meal: None,
      created_meal_id: None,
    }
  }
}

#[derive(Clone)]
pub struct SendMessageCtxData {
  pub app_state: AppState,
  pub session: Session,
  pub meal_id: String,
  pub submission: MessageSubmission,
  pub meal: Option<Meal>,
  pub new_message: Option<NewMessage>,
  pub created_message_id: Option<Uuid>,
}

impl SendMessageCtxData {
  pub fn new(app_state: AppState, session: Session, meal_id: impl Into<String>, submission: MessageSubmission) -> Self {
    Self {
      app_state,
      session,
      meal_id: meal_id.into(),
      submission,
      meal: None,
      new_message: None,
      created_message_id: None,
    }
  }
}
