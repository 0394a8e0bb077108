// app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use mealsaver_flow::FlowError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Authentication required")]
  Unauthenticated,

  #[error("Not permitted: {0}")]
  Unauthorized(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Storage Error: {0}")]
  Storage(#[from] sqlx::Error),

  #[error("Store Connection Error: {0}")]
  Connection(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Action Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Storage(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl From<validator::ValidationErrors> for AppError {
  fn from(errors: validator::ValidationErrors) -> Self {
    AppError::Validation(errors.to_string())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
      AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Storage(_) | AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    let body = match self {
      AppError::Unauthenticated => json!({"error": "You need to be signed in to do that."}),
      AppError::Unauthorized(m) => json!({"error": m}),
      AppError::NotFound(m) => json!({"error": m}),
      AppError::Validation(m) => json!({"error": m}),
      AppError::Storage(_) => json!({"error": "Database operation failed"}),
      AppError::Connection(_) => json!({"error": "Database is unavailable, try again shortly"}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
      AppError::Workflow { source } => {
        tracing::error!(flow_error_source = ?source, "Workflow error details");
        json!({"error": "Workflow processing error", "detail": source.to_string()})
      }
      AppError::Internal(m) => json!({"error": "An internal error occurred", "detail": m}),
    };
    HttpResponse::build(self.status_code()).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
