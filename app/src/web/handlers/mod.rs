// app/src/web/handlers/mod.rs

pub mod meal_handlers;
pub mod message_handlers;
