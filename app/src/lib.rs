// app/src/lib.rs

//! MealSaver backend: meal listings, buyer-to-restaurant messaging and the
//! HTTP API in front of them.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod queries;
pub mod services;
pub mod state;
pub mod views;
pub mod web;
