// app/tests/send_message_tests.rs

mod common;

use common::*;
use mealsaver_app::errors::AppError;
use mealsaver_app::models::MessageSubmission;
use mealsaver_app::pipelines::send_message;
use mealsaver_app::queries;
use mealsaver_app::services::session::Session;
use serde_json::json;
use uuid::Uuid;

fn submission(body: &str) -> MessageSubmission {
  MessageSubmission {
    body: Some(body.to_string()),
    name: None,
    email: None,
    phone: Some("555-0177".to_string()),
  }
}

#[tokio::test]
async fn message_reaches_the_meal_owner_unread() {
  let (state, _) = memory_state();
  let meal = insert_meal(&state, "chef", "Tacos").await;

  let id = send_message(&state, session_for("buyer"), &meal.id.to_string(), submission("Can I pick up at 6?"))
    .await
    .unwrap();

  let message = state.gateway.messages().find_message(&id.to_string()).await.unwrap().unwrap();
  assert_eq!(message.recipient_id, "chef");
  assert_eq!(message.sender_id, "buyer");
  assert_eq!(message.sender_email, "buyer@example.com");
  assert_eq!(message.sender_phone.as_deref(), Some("555-0177"));
  assert!(!message.read);
}

#[tokio::test]
async fn unknown_meal_is_not_found() {
  let (state, _) = memory_state();
  let result = send_message(&state, session_for("buyer"), &Uuid::new_v4().to_string(), submission("hi")).await;
  assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn blank_body_and_self_messages_are_rejected() {
  let (state, _) = memory_state();
  let meal = insert_meal(&state, "chef", "Tacos").await;
  let meal_id = meal.id.to_string();

  let result = send_message(&state, session_for("buyer"), &meal_id, submission("   ")).await;
  assert!(matches!(result, Err(AppError::Validation(_))));

  let result = send_message(&state, session_for("chef"), &meal_id, submission("hello me")).await;
  assert!(matches!(result, Err(AppError::Validation(_))));

  assert_eq!(state.gateway.messages().count_unread("chef").await.unwrap(), 0);
}

#[tokio::test]
async fn anonymous_sender_is_unauthenticated() {
  let (state, _) = memory_state();
  let meal = insert_meal(&state, "chef", "Tacos").await;
  let result = send_message(&state, Session::Anonymous, &meal.id.to_string(), submission("hi")).await;
  assert!(matches!(result, Err(AppError::Unauthenticated)));
}

#[tokio::test]
async fn sending_refreshes_the_recipient_badge() {
  let (state, _) = memory_state();
  let meal = insert_meal(&state, "chef", "Tacos").await;
  let chef = session_for("chef");
  assert_eq!(queries::unread_count(&state, &chef).await.unwrap(), json!({ "count": 0 }));

  send_message(&state, session_for("buyer"), &meal.id.to_string(), submission("hi"))
    .await
    .unwrap();

  assert_eq!(queries::unread_count(&state, &chef).await.unwrap(), json!({ "count": 1 }));
}
