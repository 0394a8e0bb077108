// app/src/web/handlers/message_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::Result;
use crate::models::MessageSubmission;
use crate::pipelines;
use crate::queries;
use crate::services::session::Session;
use crate::state::AppState;

#[instrument(name = "handler::inbox", skip_all)]
pub async fn inbox_handler(app_state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
  let view = queries::inbox(&app_state, &session).await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::unread_count", skip_all)]
pub async fn unread_count_handler(app_state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
  let view = queries::unread_count(&app_state, &session).await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::toggle_read", skip(app_state, session, path), fields(message_id = %path.as_str()))]
pub async fn toggle_read_handler(
  app_state: web::Data<AppState>,
  session: Session,
  path: web::Path<String>,
) -> Result<HttpResponse> {
  let message_id = path.into_inner();
  let read = pipelines::toggle_message_read(&app_state, session, &message_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "read": read })))
}

#[instrument(name = "handler::send_message", skip(app_state, session, path, body), fields(meal_id = %path.as_str()))]
pub async fn send_message_handler(
  app_state: web::Data<AppState>,
  session: Session,
  path: web::Path<String>,
  body: web::Json<MessageSubmission>,
) -> Result<HttpResponse> {
  let meal_id = path.into_inner();
  let message_id = pipelines::send_message(&app_state, session, &meal_id, body.into_inner()).await?;
  Ok(HttpResponse::Created().json(json!({ "id": message_id })))
}
