// app/src/web/handlers/meal_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::Result;
use crate::models::MealSubmission;
use crate::pipelines;
use crate::queries;
use crate::services::session::Session;
use crate::state::AppState;

#[instrument(name = "handler::list_meals", skip_all)]
pub async fn list_meals_handler(app_state: web::Data<AppState>) -> Result<HttpResponse> {
  let view = queries::list_meals(&app_state).await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::get_meal", skip(app_state, path), fields(meal_id = %path.as_str()))]
pub async fn get_meal_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
  let meal_id = path.into_inner();
  let view = queries::meal_detail(&app_state, &meal_id).await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::my_meals", skip_all)]
pub async fn my_meals_handler(app_state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
  let view = queries::my_meals(&app_state, &session).await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::create_meal", skip_all)]
pub async fn create_meal_handler(
  app_state: web::Data<AppState>,
  session: Session,
  body: web::Json<MealSubmission>,
) -> Result<HttpResponse> {
  let meal_id = pipelines::create_meal(&app_state, session, body.into_inner()).await?;
  info!(%meal_id, "Meal listing created.");
  Ok(HttpResponse::Created().json(json!({ "id": meal_id })))
}
