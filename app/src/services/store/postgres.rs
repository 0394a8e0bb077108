// app/src/services/store/postgres.rs

use super::{parse_document_id, MealStore, MessageStore, StoreBackend};
use crate::errors::{AppError, Result};
use crate::models::{Meal, Message, NewMeal, NewMessage};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{error, info, instrument};
use uuid::Uuid;

const MEAL_COLUMNS: &str = "id, owner_id, name, cuisine, description, available, original_price, \
   discount_percentage, price, portion_size, time_remaining, stock_quantity, total_orders, features, \
   images, restaurant, created_at, updated_at";

const MESSAGE_COLUMNS: &str =
  "id, sender_id, recipient_id, meal_id, sender_name, sender_email, sender_phone, body, read, created_at";

/// PostgreSQL backend. The pool is opened on first use and shared afterwards;
/// a failed attempt leaves nothing cached so the next call tries again.
pub struct PgStore {
  database_url: String,
  max_connections: u32,
  connect_timeout: Duration,
  pool: OnceCell<PgPool>,
}

impl PgStore {
  pub fn new(database_url: impl Into<String>, max_connections: u32, connect_timeout: Duration) -> Self {
    Self {
      database_url: database_url.into(),
      max_connections,
      connect_timeout,
      pool: OnceCell::new(),
    }
  }

  async fn pool(&self) -> Result<&PgPool> {
    self
      .pool
      .get_or_try_init(|| async {
        info!(max_connections = self.max_connections, "Opening database pool.");
        let pool = PgPoolOptions::new()
          .max_connections(self.max_connections)
          .acquire_timeout(self.connect_timeout)
          .connect(&self.database_url)
          .await
          .map_err(|e| {
            error!(error = %e, "Failed to connect to the database.");
            AppError::Connection(e.to_string())
          })?;
        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
          error!(error = %e, "Failed to apply database migrations.");
          AppError::Connection(format!("migrations failed: {}", e))
        })?;
        info!("Database pool ready.");
        Ok(pool)
      })
      .await
  }
}

#[async_trait]
impl StoreBackend for PgStore {
  fn backend_name(&self) -> &'static str {
    "postgres"
  }

  fn as_meals(&self) -> &dyn MealStore {
    self
  }

  fn as_messages(&self) -> &dyn MessageStore {
    self
  }

  async fn connect(&self) -> Result<()> {
    self.pool().await.map(|_| ())
  }
}

#[async_trait]
impl MealStore for PgStore {
  #[instrument(name = "store::insert_meal", skip(self, new_meal), fields(owner_id = %new_meal.owner_id), err)]
  async fn insert_meal(&self, new_meal: NewMeal) -> Result<Meal> {
    let pool = self.pool().await?;
    let sql = format!(
      "INSERT INTO meals (id, owner_id, name, cuisine, description, available, original_price, \
       discount_percentage, price, portion_size, time_remaining, stock_quantity, total_orders, features, \
       images, restaurant) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 0, $13, $14, $15) RETURNING {}",
      MEAL_COLUMNS
    );
    let meal = sqlx::query_as::<_, Meal>(&sql)
      .bind(Uuid::new_v4())
      .bind(&new_meal.owner_id)
      .bind(&new_meal.name)
      .bind(&new_meal.cuisine)
      .bind(&new_meal.description)
      .bind(new_meal.available)
      .bind(new_meal.original_price)
      .bind(new_meal.discount_percentage)
      .bind(new_meal.price)
      .bind(&new_meal.portion_size)
      .bind(new_meal.time_remaining)
      .bind(new_meal.stock_quantity)
      .bind(&new_meal.features)
      .bind(&new_meal.images)
      .bind(Json(&new_meal.restaurant))
      .fetch_one(pool)
      .await?;
    Ok(meal)
  }

  #[instrument(name = "store::find_meal", skip(self), err)]
  async fn find_meal(&self, id: &str) -> Result<Option<Meal>> {
    let Some(meal_id) = parse_document_id(id) else {
      return Ok(None);
    };
    let pool = self.pool().await?;
    let sql = format!("SELECT {} FROM meals WHERE id = $1", MEAL_COLUMNS);
    let meal = sqlx::query_as::<_, Meal>(&sql).bind(meal_id).fetch_optional(pool).await?;
    Ok(meal)
  }

  #[instrument(name = "store::list_meals", skip(self), err)]
  async fn list_meals(&self) -> Result<Vec<Meal>> {
    let pool = self.pool().await?;
    let sql = format!("SELECT {} FROM meals ORDER BY created_at DESC", MEAL_COLUMNS);
    Ok(sqlx::query_as::<_, Meal>(&sql).fetch_all(pool).await?)
  }

  #[instrument(name = "store::list_meals_by_owner", skip(self), err)]
  async fn list_meals_by_owner(&self, owner_id: &str) -> Result<Vec<Meal>> {
    let pool = self.pool().await?;
    let sql = format!(
      "SELECT {} FROM meals WHERE owner_id = $1 ORDER BY created_at DESC",
      MEAL_COLUMNS
    );
    Ok(sqlx::query_as::<_, Meal>(&sql).bind(owner_id).fetch_all(pool).await?)
  }
}

#[async_trait]
impl MessageStore for PgStore {
  #[instrument(name = "store::insert_message", skip(self, new_message), fields(meal_id = %new_message.meal_id), err)]
  async fn insert_message(&self, new_message: NewMessage) -> Result<Message> {
    let pool = self.pool().await?;
    let sql = format!(
      "INSERT INTO messages (id, sender_id, recipient_id, meal_id, sender_name, sender_email, sender_phone, body, read) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE) RETURNING {}",
      MESSAGE_COLUMNS
    );
    let message = sqlx::query_as::<_, Message>(&sql)
      .bind(Uuid::new_v4())
      .bind(&new_message.sender_id)
      .bind(&new_message.recipient_id)
      .bind(new_message.meal_id)
      .bind(&new_message.sender_name)
      .bind(&new_message.sender_email)
      .bind(&new_message.sender_phone)
      .bind(&new_message.body)
      .fetch_one(pool)
      .await?;
    Ok(message)
  }

  #[instrument(name = "store::find_message", skip(self), err)]
  async fn find_message(&self, id: &str) -> Result<Option<Message>> {
    let Some(message_id) = parse_document_id(id) else {
      return Ok(None);
    };
    let pool = self.pool().await?;
    let sql = format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS);
    let message = sqlx::query_as::<_, Message>(&sql)
      .bind(message_id)
      .fetch_optional(pool)
      .await?;
    Ok(message)
  }

  #[instrument(name = "store::save_message", skip(self, message), fields(message_id = %message.id), err)]
  async fn save_message(&self, message: &Message) -> Result<()> {
    let pool = self.pool().await?;
    let result = sqlx::query(
      "UPDATE messages SET sender_id = $2, recipient_id = $3, meal_id = $4, sender_name = $5, \
       sender_email = $6, sender_phone = $7, body = $8, read = $9 WHERE id = $1",
    )
    .bind(message.id)
    .bind(&message.sender_id)
    .bind(&message.recipient_id)
    .bind(message.meal_id)
    .bind(&message.sender_name)
    .bind(&message.sender_email)
    .bind(&message.sender_phone)
    .bind(&message.body)
    .bind(message.read)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::NotFound(format!("Message {} no longer exists.", message.id)));
    }
    Ok(())
  }

  #[instrument(name = "store::list_messages_for", skip(self), err)]
  async fn list_messages_for(&self, recipient_id: &str) -> Result<Vec<Message>> {
    let pool = self.pool().await?;
    let sql = format!(
      "SELECT {} FROM messages WHERE recipient_id = $1 ORDER BY read ASC, created_at DESC",
      MESSAGE_COLUMNS
    );
    Ok(sqlx::query_as::<_, Message>(&sql).bind(recipient_id).fetch_all(pool).await?)
  }

  #[instrument(name = "store::count_unread", skip(self), err)]
  async fn count_unread(&self, recipient_id: &str) -> Result<u64> {
    let pool = self.pool().await?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND read = FALSE")
      .bind(recipient_id)
      .fetch_one(pool)
      .await?;
    Ok(count.max(0) as u64)
  }
}
