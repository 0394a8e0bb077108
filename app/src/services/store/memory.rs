// app/src/services/store/memory.rs

use super::{parse_document_id, MealStore, MessageStore, StoreBackend};
use crate::errors::{AppError, Result};
use crate::models::{Meal, Message, NewMeal, NewMessage};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument};
use uuid::Uuid;

/// In-process backend used by tests and `STORAGE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryStore {
  meals: RwLock<Vec<Meal>>,
  messages: RwLock<Vec<Message>>,
  offline: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Simulates an unreachable store: every call fails with a connection error
  /// until switched back.
  pub fn set_offline(&self, offline: bool) {
    self.offline.store(offline, Ordering::SeqCst);
  }

  fn ensure_online(&self) -> Result<()> {
    if self.offline.load(Ordering::SeqCst) {
      return Err(AppError::Connection("memory store is offline".to_string()));
    }
    Ok(())
  }
}

#[async_trait]
impl StoreBackend for MemoryStore {
  fn backend_name(&self) -> &'static str {
    "memory"
  }

  fn as_meals(&self) -> &dyn MealStore {
    self
  }

  fn as_messages(&self) -> &dyn MessageStore {
    self
  }

  async fn connect(&self) -> Result<()> {
    self.ensure_online()
  }
}

#[async_trait]
impl MealStore for MemoryStore {
  #[instrument(name = "memory::insert_meal", skip(self, new_meal))]
  async fn insert_meal(&self, new_meal: NewMeal) -> Result<Meal> {
    self.ensure_online()?;
    let now = Utc::now();
    let meal = Meal {
      id: Uuid::new_v4(),
      owner_id: new_meal.owner_id,
      name: new_meal.name,
      cuisine: new_meal.cuisine,
      description: new_meal.description,
      available: new_meal.available,
      original_price: new_meal.original_price,
      discount_percentage: new_meal.discount_percentage,
      price: new_meal.price,
      portion_size: new_meal.portion_size,
      time_remaining: new_meal.time_remaining,
      stock_quantity: new_meal.stock_quantity,
      total_orders: 0,
      features: new_meal.features,
      images: new_meal.images,
      restaurant: new_meal.restaurant,
      created_at: now,
      updated_at: now,
    };
    self.meals.write().push(meal.clone());
    debug!(meal_id = %meal.id, "Meal stored.");
    Ok(meal)
  }

  async fn find_meal(&self, id: &str) -> Result<Option<Meal>> {
    self.ensure_online()?;
    let Some(meal_id) = parse_document_id(id) else {
      return Ok(None);
    };
    Ok(self.meals.read().iter().find(|m| m.id == meal_id).cloned())
  }

  async fn list_meals(&self) -> Result<Vec<Meal>> {
    self.ensure_online()?;
    // Insertion order is creation order.
    Ok(self.meals.read().iter().rev().cloned().collect())
  }

  async fn list_meals_by_owner(&self, owner_id: &str) -> Result<Vec<Meal>> {
    self.ensure_online()?;
    Ok(
      self
        .meals
        .read()
        .iter()
        .rev()
        .filter(|m| m.owner_id == owner_id)
        .cloned()
        .collect(),
    )
  }
}

#[async_trait]
impl MessageStore for MemoryStore {
  #[instrument(name = "memory::insert_message", skip(self, new_message))]
  async fn insert_message(&self, new_message: NewMessage) -> Result<Message> {
    self.ensure_online()?;
    let message = Message {
      id: Uuid::new_v4(),
      sender_id: new_message.sender_id,
      recipient_id: new_message.recipient_id,
      meal_id: new_message.meal_id,
      sender_name: new_message.sender_name,
      sender_email: new_message.sender_email,
      sender_phone: new_message.sender_phone,
      body: new_message.body,
      read: false,
      created_at: Utc::now(),
    };
    self.messages.write().push(message.clone());
    debug!(message_id = %message.id, "Message stored.");
    Ok(message)
  }

  async fn find_message(&self, id: &str) -> Result<Option<Message>> {
    self.ensure_online()?;
    let Some(message_id) = parse_document_id(id) else {
      return Ok(None);
    };
    Ok(self.messages.read().iter().find(|m| m.id == message_id).cloned())
  }

  async fn save_message(&self, message: &Message) -> Result<()> {
    self.ensure_online()?;
    let mut messages = self.messages.write();
    match messages.iter_mut().find(|m| m.id == message.id) {
      Some(stored) => {
        *stored = message.clone();
        Ok(())
      }
      None => Err(AppError::NotFound(format!("Message {} no longer exists.", message.id))),
    }
  }

  async fn list_messages_for(&self, recipient_id: &str) -> Result<Vec<Message>> {
    self.ensure_online()?;
    let mut inbox: Vec<Message> = self
      .messages
      .read()
      .iter()
      .rev()
      .filter(|m| m.recipient_id == recipient_id)
      .cloned()
      .collect();
    // Stable: newest-first order is kept within the unread and read groups.
    inbox.sort_by_key(|m| m.read);
    Ok(inbox)
  }

  async fn count_unread(&self, recipient_id: &str) -> Result<u64> {
    self.ensure_online()?;
    let count = self
      .messages
      .read()
      .iter()
      .filter(|m| m.recipient_id == recipient_id && !m.read)
      .count();
    Ok(count as u64)
  }
}
