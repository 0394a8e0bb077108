// app/src/web/extract.rs

use crate::errors::AppError;
use crate::services::session::Session;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

/// Handlers take the caller's `Session` as an argument; it is resolved from
/// the request credentials and is `Anonymous` when they are absent or invalid.
impl FromRequest for Session {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let session = match req.app_data::<web::Data<AppState>>() {
      Some(app_state) => Ok(app_state.sessions.current_user(req)),
      None => Err(AppError::Internal("application state is not configured".to_string())),
    };
    ready(session)
  }
}
