// app/src/web/routes.rs

use crate::errors::{AppError, Result};
use crate::state::AppState;
use crate::web::handlers::{meal_handlers, message_handlers};
use actix_web::{web, HttpResponse};
use serde_json::json;

async fn health_check_handler(app_state: web::Data<AppState>) -> Result<HttpResponse> {
  app_state.gateway.connect().await?;
  Ok(HttpResponse::Ok().json(json!({ "status": "ok", "store": app_state.gateway.backend_name() })))
}

/// Malformed JSON bodies are reported like any other validation failure.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.app_data(json_config()).service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/meals")
          .route("", web::get().to(meal_handlers::list_meals_handler))
          .route("", web::post().to(meal_handlers::create_meal_handler))
          // Registered before "/{meal_id}" so it is not read as an id.
          .route("/mine", web::get().to(meal_handlers::my_meals_handler))
          .route("/{meal_id}", web::get().to(meal_handlers::get_meal_handler))
          .route(
            "/{meal_id}/messages",
            web::post().to(message_handlers::send_message_handler),
          ),
      )
      .service(
        web::scope("/messages")
          .route("", web::get().to(message_handlers::inbox_handler))
          .route("/unread-count", web::get().to(message_handlers::unread_count_handler))
          .route(
            "/{message_id}/toggle-read",
            web::post().to(message_handlers::toggle_read_handler),
          ),
      ),
  );
}
