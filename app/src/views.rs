// app/src/views.rs

//! Serializable projections of meals and messages for the read endpoints.
//! Nothing here touches storage or sessions.

use crate::models::{Meal, Message, Restaurant};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const AVAILABLE_LABEL: &str = "Available Now";
pub const SOLD_OUT_LABEL: &str = "Sold Out";

fn availability_label(available: bool) -> &'static str {
  if available {
    AVAILABLE_LABEL
  } else {
    SOLD_OUT_LABEL
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetailView {
  pub id: Uuid,
  pub name: String,
  pub cuisine: String,
  pub description: String,
  pub available: bool,
  pub availability_label: &'static str,
  pub original_price: f64,
  pub discount_percentage: f64,
  pub price: f64,
  /// Display only; derived from the stored prices, never persisted.
  pub savings: f64,
  pub portion_size: String,
  pub time_remaining: i32,
  pub stock_quantity: i32,
  pub total_orders: i32,
  pub features: Vec<String>,
  pub primary_image: Option<String>,
  pub images: Vec<String>,
  pub restaurant: Restaurant,
  pub owner_id: String,
  pub checkout_url: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<&Meal> for MealDetailView {
  fn from(meal: &Meal) -> Self {
    Self {
      id: meal.id,
      name: meal.name.clone(),
      cuisine: meal.cuisine.clone(),
      description: meal.description.clone(),
      available: meal.available,
      availability_label: availability_label(meal.available),
      original_price: meal.original_price,
      discount_percentage: meal.discount_percentage,
      price: meal.price,
      savings: meal.original_price - meal.price,
      portion_size: meal.portion_size.clone(),
      time_remaining: meal.time_remaining,
      stock_quantity: meal.stock_quantity,
      total_orders: meal.total_orders,
      features: meal.features.clone(),
      primary_image: meal.primary_image().map(str::to_string),
      images: meal.images.clone(),
      restaurant: meal.restaurant.clone(),
      owner_id: meal.owner_id.clone(),
      checkout_url: meal.available.then(|| format!("/meals/checkout/{}", meal.id)),
      created_at: meal.created_at,
      updated_at: meal.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealCardView {
  pub id: Uuid,
  pub name: String,
  pub cuisine: String,
  pub primary_image: Option<String>,
  pub price: f64,
  pub original_price: f64,
  pub discount_percentage: f64,
  pub time_remaining: i32,
  pub available: bool,
  pub availability_label: &'static str,
  pub restaurant_name: String,
}

impl From<&Meal> for MealCardView {
  fn from(meal: &Meal) -> Self {
    Self {
      id: meal.id,
      name: meal.name.clone(),
      cuisine: meal.cuisine.clone(),
      primary_image: meal.primary_image().map(str::to_string),
      price: meal.price,
      original_price: meal.original_price,
      discount_percentage: meal.discount_percentage,
      time_remaining: meal.time_remaining,
      available: meal.available,
      availability_label: availability_label(meal.available),
      restaurant_name: meal.restaurant.name.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxEntryView {
  pub id: Uuid,
  pub meal_id: Uuid,
  /// `None` when the meal no longer resolves.
  pub meal_name: Option<String>,
  pub sender_name: String,
  pub sender_email: String,
  pub sender_phone: Option<String>,
  pub body: String,
  pub read: bool,
  pub created_at: DateTime<Utc>,
}

impl InboxEntryView {
  pub fn new(message: &Message, meal: Option<&Meal>) -> Self {
    Self {
      id: message.id,
      meal_id: message.meal_id,
      meal_name: meal.map(|m| m.name.clone()),
      sender_name: message.sender_name.clone(),
      sender_email: message.sender_email.clone(),
      sender_phone: message.sender_phone.clone(),
      body: message.body.clone(),
      read: message.read,
      created_at: message.created_at,
    }
  }
}
