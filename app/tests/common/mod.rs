// app/tests/common/mod.rs
#![allow(dead_code)]

use jsonwebtoken::{encode, EncodingKey, Header};
use mealsaver_app::config::{AppConfig, StorageBackend};
use mealsaver_app::models::{Meal, MealSubmission, NewMessage, RestaurantSubmission};
use mealsaver_app::services::session::{Session, SessionClaims, SessionUser};
use mealsaver_app::services::store::{Gateway, MemoryStore};
use mealsaver_app::state::AppState;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";

static TRACING: Lazy<()> = Lazy::new(|| {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
  tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    storage_backend: StorageBackend::Memory,
    database_url: None,
    database_max_connections: 1,
    database_connect_timeout: Duration::from_secs(1),
    session_secret: SECRET.to_string(),
    seed_db: false,
  }
}

/// App state over a fresh memory store; the store handle is returned too so
/// tests can take it offline.
pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let gateway = Gateway::new(store.clone());
  (AppState::new(Arc::new(test_config()), gateway), store)
}

pub fn session_for(user_id: &str) -> Session {
  Session::Authenticated(SessionUser {
    user_id: user_id.to_string(),
    name: Some(format!("{} name", user_id)),
    email: Some(format!("{}@example.com", user_id)),
  })
}

pub fn token_for(user_id: &str) -> String {
  let claims = SessionClaims {
    sub: user_id.to_string(),
    name: Some(format!("{} name", user_id)),
    email: Some(format!("{}@example.com", user_id)),
    exp: (chrono::Utc::now().timestamp() + 3600) as u64,
  };
  encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

pub fn meal_submission(name: &str) -> MealSubmission {
  MealSubmission {
    name: Some(name.to_string()),
    cuisine: Some("Mexican".to_string()),
    description: Some("Carnitas tacos with salsa verde".to_string()),
    available: true,
    original_price: Some(12.0),
    discount_percentage: Some(50.0),
    price: Some(6.0),
    portion_size: Some("3 tacos".to_string()),
    time_remaining: Some(60),
    stock_quantity: Some(4),
    features: vec!["Spicy".to_string(), "Gluten Free".to_string()],
    images: vec!["https://img.example/tacos.jpg".to_string()],
    restaurant: Some(RestaurantSubmission {
      name: Some("Taquería El Sol".to_string()),
      address: Some("77 Mission St".to_string()),
      city: Some("San Francisco".to_string()),
      state: Some("CA".to_string()),
      email: Some("hola@elsol.example".to_string()),
      phone: Some("415-555-0123".to_string()),
    }),
  }
}

pub async fn insert_meal(state: &AppState, owner_id: &str, name: &str) -> Meal {
  let new_meal = meal_submission(name).into_new_meal(owner_id).unwrap();
  state.gateway.meals().insert_meal(new_meal).await.unwrap()
}

/// Stores an unread message from `sender` to `recipient` about `meal_id`.
pub async fn insert_message(state: &AppState, sender: &str, recipient: &str, meal_id: Uuid) -> Uuid {
  let message = state
    .gateway
    .messages()
    .insert_message(NewMessage {
      sender_id: sender.to_string(),
      recipient_id: recipient.to_string(),
      meal_id,
      sender_name: "Buyer".to_string(),
      sender_email: "buyer@example.com".to_string(),
      sender_phone: None,
      body: "Is this still available?".to_string(),
    })
    .await
    .unwrap();
  message.id
}

pub async fn read_flag(state: &AppState, message_id: Uuid) -> bool {
  state
    .gateway
    .messages()
    .find_message(&message_id.to_string())
    .await
    .unwrap()
    .unwrap()
    .read
}
