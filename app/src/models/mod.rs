// app/src/models/mod.rs

//! Persisted entities and the request payloads that create them.

pub mod meal;
pub mod message;

pub use meal::{Meal, MealSubmission, NewMeal, Restaurant, RestaurantSubmission};
pub use message::{Message, MessageSubmission, NewMessage};
