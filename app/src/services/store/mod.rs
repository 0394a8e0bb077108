// app/src/services/store/mod.rs

//! Persistence gateway: typed accessors for the meal and message collections
//! over a single lazily opened connection.

pub mod memory;
pub mod postgres;

use crate::errors::Result;
use crate::models::{Meal, Message, NewMeal, NewMessage};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait MealStore: Send + Sync {
  async fn insert_meal(&self, new_meal: NewMeal) -> Result<Meal>;

  /// `None` when `id` is unknown or not a well-formed identifier.
  async fn find_meal(&self, id: &str) -> Result<Option<Meal>>;

  /// Newest first.
  async fn list_meals(&self) -> Result<Vec<Meal>>;

  /// Newest first.
  async fn list_meals_by_owner(&self, owner_id: &str) -> Result<Vec<Meal>>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
  async fn insert_message(&self, new_message: NewMessage) -> Result<Message>;

  /// `None` when `id` is unknown or not a well-formed identifier.
  async fn find_message(&self, id: &str) -> Result<Option<Message>>;

  /// Writes the whole message back. Last write wins.
  async fn save_message(&self, message: &Message) -> Result<()>;

  /// Unread first, then newest first.
  async fn list_messages_for(&self, recipient_id: &str) -> Result<Vec<Message>>;

  async fn count_unread(&self, recipient_id: &str) -> Result<u64>;
}

#[async_trait]
pub trait StoreBackend: MealStore + MessageStore {
  fn backend_name(&self) -> &'static str;

  fn as_meals(&self) -> &dyn MealStore;

  fn as_messages(&self) -> &dyn MessageStore;

  /// Opens the connection, or reuses it when it is already live.
  async fn connect(&self) -> Result<()>;
}

/// Process-wide handle to the configured backend. Cloning shares the backend
/// and its connection.
#[derive(Clone)]
pub struct Gateway {
  backend: Arc<dyn StoreBackend>,
}

impl Gateway {
  pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
    Self { backend }
  }

  pub fn backend_name(&self) -> &'static str {
    self.backend.backend_name()
  }

  pub async fn connect(&self) -> Result<()> {
    self.backend.connect().await
  }

  pub fn meals(&self) -> &dyn MealStore {
    self.backend.as_meals()
  }

  pub fn messages(&self) -> &dyn MessageStore {
    self.backend.as_messages()
  }
}

/// Identifiers are opaque strings at the edges; anything that is not a UUID
/// cannot name a stored document.
pub(crate) fn parse_document_id(id: &str) -> Option<Uuid> {
  Uuid::parse_str(id.trim()).ok()
}
