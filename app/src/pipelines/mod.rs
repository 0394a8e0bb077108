// app/src/pipelines/mod.rs

//! The mutation actions, each expressed as an action pipeline, and their
//! registration.

use crate::errors::AppError;
use mealsaver_flow::ActionRegistry;

pub mod common_steps;
pub mod contexts;

pub mod create_meal_pipeline;
pub mod send_message_pipeline;
pub mod toggle_read_pipeline;

pub use create_meal_pipeline::create_meal;
pub use send_message_pipeline::send_message;
pub use toggle_read_pipeline::toggle_message_read;

/// Registers every action pipeline. Called once while building `AppState`.
pub fn register_all_pipelines(registry: &ActionRegistry<AppError>) {
  tracing::info!("Registering action pipelines...");

  toggle_read_pipeline::register_toggle_read_pipeline(registry);
  create_meal_pipeline::register_create_meal_pipeline(registry);
  send_message_pipeline::register_send_message_pipeline(registry);

  tracing::info!("All action pipelines registered.");
}
