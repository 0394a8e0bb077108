// app/src/queries.rs

//! Read operations behind the listing, detail, profile and inbox pages. Each
//! rendering is cached per (path, viewer) until a mutation invalidates it.

use crate::errors::{AppError, Result};
use crate::pipelines::create_meal_pipeline::LISTING_PATH;
use crate::pipelines::toggle_read_pipeline::INBOX_PATH;
use crate::services::session::Session;
use crate::state::AppState;
use crate::views::{InboxEntryView, MealCardView, MealDetailView};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

pub const MY_MEALS_PATH: &str = "/meals/mine";
pub const UNREAD_COUNT_PATH: &str = "/messages/unread-count";

#[instrument(name = "query::list_meals", skip(app_state), err(Display))]
pub async fn list_meals(app_state: &AppState) -> Result<Value> {
  app_state
    .views
    .get_or_render(LISTING_PATH, None, || async {
      let meals = app_state.gateway.meals().list_meals().await?;
      let cards: Vec<MealCardView> = meals.iter().map(MealCardView::from).collect();
      Ok::<_, AppError>(json!({ "meals": cards }))
    })
    .await
}

/// Ids are parsed before the lookup so every spelling of one id shares a
/// cache entry. Ids that do not parse are `NotFound` and never cached.
#[instrument(name = "query::meal_detail", skip(app_state), err(Display))]
pub async fn meal_detail(app_state: &AppState, meal_id: &str) -> Result<Value> {
  let id = Uuid::parse_str(meal_id.trim()).map_err(|_| AppError::NotFound(format!("Meal {} not found.", meal_id)))?;
  let path = format!("{}/{}", LISTING_PATH, id);
  app_state
    .views
    .get_or_render(&path, None, || async {
      let meal = app_state
        .gateway
        .meals()
        .find_meal(&id.to_string())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Meal {} not found.", id)))?;
      Ok::<_, AppError>(json!({ "meal": MealDetailView::from(&meal) }))
    })
    .await
}

#[instrument(name = "query::my_meals", skip_all, err(Display))]
pub async fn my_meals(app_state: &AppState, session: &Session) -> Result<Value> {
  let user = session.require_user()?;
  app_state
    .views
    .get_or_render(MY_MEALS_PATH, Some(&user.user_id), || async {
      let meals = app_state.gateway.meals().list_meals_by_owner(&user.user_id).await?;
      let cards: Vec<MealCardView> = meals.iter().map(MealCardView::from).collect();
      Ok::<_, AppError>(json!({ "meals": cards }))
    })
    .await
}

#[instrument(name = "query::inbox", skip_all, err(Display))]
pub async fn inbox(app_state: &AppState, session: &Session) -> Result<Value> {
  let user = session.require_user()?;
  app_state
    .views
    .get_or_render(INBOX_PATH, Some(&user.user_id), || async {
      let messages = app_state.gateway.messages().list_messages_for(&user.user_id).await?;

      // One lookup per distinct meal.
      let mut meal_names = HashMap::new();
      for message in &messages {
        if !meal_names.contains_key(&message.meal_id) {
          let meal = app_state.gateway.meals().find_meal(&message.meal_id.to_string()).await?;
          meal_names.insert(message.meal_id, meal);
        }
      }

      let entries: Vec<InboxEntryView> = messages
        .iter()
        .map(|m| InboxEntryView::new(m, meal_names.get(&m.meal_id).and_then(Option::as_ref)))
        .collect();
      Ok::<_, AppError>(json!({ "messages": entries }))
    })
    .await
}

#[instrument(name = "query::unread_count", skip_all, err(Display))]
pub async fn unread_count(app_state: &AppState, session: &Session) -> Result<Value> {
  let user = session.require_user()?;
  app_state
    .views
    .get_or_render(UNREAD_COUNT_PATH, Some(&user.user_id), || async {
      let count = app_state.gateway.messages().count_unread(&user.user_id).await?;
      Ok::<_, AppError>(json!({ "count": count }))
    })
    .await
}
