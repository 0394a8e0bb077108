// app/src/models/meal.rs

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Restaurant record embedded in every meal (stored as JSONB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
  pub name: String,
  pub address: String,
  pub city: String,
  pub state: String,
  pub email: String,
  pub phone: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
  pub id: Uuid,
  pub owner_id: String,
  pub name: String,
  pub cuisine: String,
  pub description: String,
  pub available: bool,
  pub original_price: f64,
  pub discount_percentage: f64,
  /// Caller-supplied; not derived from the other two prices.
  pub price: f64,
  pub portion_size: String,
  /// Minutes.
  pub time_remaining: i32,
  pub stock_quantity: i32,
  pub total_orders: i32,
  pub features: Vec<String>,
  pub images: Vec<String>,
  #[sqlx(json)]
  pub restaurant: Restaurant,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Meal {
  pub fn primary_image(&self) -> Option<&str> {
    self.images.first().map(String::as_str)
  }
}

/// A validated meal ready to be persisted. Built only through
/// [`MealSubmission::into_new_meal`].
#[derive(Debug, Clone)]
pub struct NewMeal {
  pub owner_id: String,
  pub name: String,
  pub cuisine: String,
  pub description: String,
  pub available: bool,
  pub original_price: f64,
  pub discount_percentage: f64,
  pub price: f64,
  pub portion_size: String,
  pub time_remaining: i32,
  pub stock_quantity: i32,
  pub features: Vec<String>,
  pub images: Vec<String>,
  pub restaurant: Restaurant,
}

// `required` on the parent field records the value, so this must be `Serialize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSubmission {
  #[validate(required, length(min = 1, message = "restaurant name is required"))]
  pub name: Option<String>,
  #[validate(required, length(min = 1, message = "restaurant address is required"))]
  pub address: Option<String>,
  #[validate(required, length(min = 1, message = "restaurant city is required"))]
  pub city: Option<String>,
  #[validate(required, length(min = 1, message = "restaurant state is required"))]
  pub state: Option<String>,
  #[validate(required, email(message = "restaurant email must be a valid address"))]
  pub email: Option<String>,
  #[validate(required, length(min = 1, message = "restaurant phone is required"))]
  pub phone: Option<String>,
}

/// Request body of the create-meal action.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MealSubmission {
  #[validate(required, length(min = 1, message = "name is required"))]
  pub name: Option<String>,
  #[validate(required, length(min = 1, message = "cuisine is required"))]
  pub cuisine: Option<String>,
  #[validate(required, length(min = 1, message = "description is required"))]
  pub description: Option<String>,
  #[serde(default = "default_available")]
  pub available: bool,
  #[validate(required, range(min = 0.0))]
  pub original_price: Option<f64>,
  #[validate(required, range(min = 0.0, max = 100.0))]
  pub discount_percentage: Option<f64>,
  #[validate(required, range(min = 0.0))]
  pub price: Option<f64>,
  #[validate(required, length(min = 1, message = "portion size is required"))]
  pub portion_size: Option<String>,
  #[validate(required, range(min = 0))]
  pub time_remaining: Option<i32>,
  #[validate(required, range(min = 0))]
  pub stock_quantity: Option<i32>,
  #[serde(default)]
  pub features: Vec<String>,
  #[serde(default)]
  #[validate(length(min = 1, message = "at least one image is required"))]
  pub images: Vec<String>,
  #[validate(required, nested)]
  pub restaurant: Option<RestaurantSubmission>,
}

fn default_available() -> bool {
  true
}

impl MealSubmission {
  /// Validates the submission and normalizes it into a [`NewMeal`] owned by
  /// `owner_id`. Text is trimmed, blank entries are rejected and feature tags
  /// collapse to their first occurrence.
  pub fn into_new_meal(self, owner_id: &str) -> Result<NewMeal> {
    self.validate()?;

    let restaurant = self
      .restaurant
      .ok_or_else(|| AppError::Validation("restaurant is required".to_string()))?;

    let images: Vec<String> = self.images.iter().map(|i| i.trim().to_string()).collect();
    if images.iter().any(String::is_empty) {
      return Err(AppError::Validation("image references must not be blank".to_string()));
    }

    let mut features: Vec<String> = Vec::with_capacity(self.features.len());
    for tag in self.features.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
      if !features.iter().any(|seen| seen == tag) {
        features.push(tag.to_string());
      }
    }

    Ok(NewMeal {
      owner_id: owner_id.to_string(),
      name: required_text("name", self.name)?,
      cuisine: required_text("cuisine", self.cuisine)?,
      description: required_text("description", self.description)?,
      available: self.available,
      original_price: finite_number("originalPrice", self.original_price)?,
      discount_percentage: finite_number("discountPercentage", self.discount_percentage)?,
      price: finite_number("price", self.price)?,
      portion_size: required_text("portionSize", self.portion_size)?,
      time_remaining: self
        .time_remaining
        .ok_or_else(|| AppError::Validation("timeRemaining is required".to_string()))?,
      stock_quantity: self
        .stock_quantity
        .ok_or_else(|| AppError::Validation("stockQuantity is required".to_string()))?,
      features,
      images,
      restaurant: Restaurant {
        name: required_text("restaurant.name", restaurant.name)?,
        address: required_text("restaurant.address", restaurant.address)?,
        city: required_text("restaurant.city", restaurant.city)?,
        state: required_text("restaurant.state", restaurant.state)?,
        email: required_text("restaurant.email", restaurant.email)?,
        phone: required_text("restaurant.phone", restaurant.phone)?,
      },
    })
  }
}

fn required_text(field: &str, value: Option<String>) -> Result<String> {
  match value.as_deref().map(str::trim) {
    Some(text) if !text.is_empty() => Ok(text.to_string()),
    _ => Err(AppError::Validation(format!("{} must not be blank", field))),
  }
}

fn finite_number(field: &str, value: Option<f64>) -> Result<f64> {
  match value {
    Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
    Some(_) => Err(AppError::Validation(format!("{} must be a non-negative number", field))),
    None => Err(AppError::Validation(format!("{} is required", field))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn submission() -> MealSubmission {
    MealSubmission {
      name: Some("Pad Thai".to_string()),
      cuisine: Some("Thai".to_string()),
      description: Some("Rice noodles, tamarind, peanuts".to_string()),
      available: true,
      original_price: Some(14.0),
      discount_percentage: Some(40.0),
      price: Some(8.4),
      portion_size: Some("Large".to_string()),
      time_remaining: Some(90),
      stock_quantity: Some(3),
      features: vec!["Vegan".to_string(), "Spicy".to_string(), "Vegan".to_string()],
      images: vec!["https://img.example/pad-thai.jpg".to_string()],
      restaurant: Some(RestaurantSubmission {
        name: Some("Bangkok Corner".to_string()),
        address: Some("12 Elm St".to_string()),
        city: Some("Boston".to_string()),
        state: Some("MA".to_string()),
        email: Some("hello@bangkok.example".to_string()),
        phone: Some("555-0100".to_string()),
      }),
    }
  }

  #[test]
  fn normalizes_a_complete_submission() {
    let meal = submission().into_new_meal("user-1").unwrap();
    assert_eq!(meal.owner_id, "user-1");
    assert_eq!(meal.features, vec!["Vegan".to_string(), "Spicy".to_string()]);
    assert_eq!(meal.restaurant.name, "Bangkok Corner");
  }

  #[test]
  fn missing_name_is_a_validation_error() {
    let mut s = submission();
    s.name = None;
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));
  }

  #[test]
  fn blank_name_is_a_validation_error() {
    let mut s = submission();
    s.name = Some("   ".to_string());
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));
  }

  #[test]
  fn requires_an_image() {
    let mut s = submission();
    s.images.clear();
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));
  }

  #[test]
  fn rejects_out_of_range_numbers() {
    let mut s = submission();
    s.discount_percentage = Some(120.0);
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));

    let mut s = submission();
    s.price = Some(-1.0);
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));

    let mut s = submission();
    s.stock_quantity = Some(-2);
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));
  }

  #[test]
  fn accepts_prices_that_do_not_add_up() {
    let mut s = submission();
    s.price = Some(13.99);
    let meal = s.into_new_meal("user-1").unwrap();
    assert_eq!(meal.price, 13.99);
  }

  #[test]
  fn missing_restaurant_is_rejected() {
    let mut s = submission();
    s.restaurant = None;
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));
  }

  #[test]
  fn invalid_restaurant_email_is_rejected() {
    let mut s = submission();
    if let Some(r) = s.restaurant.as_mut() {
      r.email = Some("not-an-email".to_string());
    }
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));
  }

  #[test]
  fn missing_restaurant_detail_is_rejected() {
    let mut s = submission();
    if let Some(r) = s.restaurant.as_mut() {
      r.city = None;
    }
    assert!(matches!(s.into_new_meal("user-1"), Err(AppError::Validation(_))));
  }
}
