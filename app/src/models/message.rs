// app/src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
  pub id: Uuid,
  pub sender_id: String,
  pub recipient_id: String,
  pub meal_id: Uuid,
  pub sender_name: String,
  pub sender_email: String,
  pub sender_phone: Option<String>,
  pub body: String,
  pub read: bool,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
  pub sender_id: String,
  pub recipient_id: String,
  pub meal_id: Uuid,
  pub sender_name: String,
  pub sender_email: String,
  pub sender_phone: Option<String>,
  pub body: String,
}

/// Request body of the send-message action. Contact fields left out fall
/// back to the sender's session profile.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MessageSubmission {
  #[validate(
    required(message = "message body is required"),
    length(min = 1, max = 4000, message = "message body must be 1 to 4000 characters")
  )]
  pub body: Option<String>,
  #[validate(length(min = 1))]
  pub name: Option<String>,
  #[validate(email(message = "email must be a valid address"))]
  pub email: Option<String>,
  pub phone: Option<String>,
}
