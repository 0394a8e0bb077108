// app/src/services/seed.rs

//! Demo listings for local runs (`SEED_DB=true`).

use crate::errors::Result;
use crate::models::{NewMeal, Restaurant};
use crate::services::store::Gateway;
use tracing::{info, instrument};

const DEMO_OWNER: &str = "demo-restaurant";

/// Inserts the demo meals unless the store already holds listings. Returns
/// how many were inserted.
#[instrument(name = "seed::seed_demo_meals", skip(gateway), err(Display))]
pub async fn seed_demo_meals(gateway: &Gateway) -> Result<usize> {
  if !gateway.meals().list_meals().await?.is_empty() {
    info!("Store already has meals; skipping demo seed.");
    return Ok(0);
  }

  let meals = demo_meals();
  let count = meals.len();
  for meal in meals {
    gateway.meals().insert_meal(meal).await?;
  }
  info!(count, "Seeded demo meals.");
  Ok(count)
}

fn demo_meals() -> Vec<NewMeal> {
  let restaurant = Restaurant {
    name: "Green Fork Kitchen".to_string(),
    address: "48 Harbor Ave".to_string(),
    city: "Portland".to_string(),
    state: "ME".to_string(),
    email: "orders@greenfork.example".to_string(),
    phone: "207-555-0142".to_string(),
  };

  let meal = |name: &str, cuisine: &str, original: f64, discount: f64, minutes: i32, features: &[&str]| NewMeal {
    owner_id: DEMO_OWNER.to_string(),
    name: name.to_string(),
    cuisine: cuisine.to_string(),
    description: format!("Freshly made {} left over from today's service.", name.to_lowercase()),
    available: true,
    original_price: original,
    discount_percentage: discount,
    price: (original * (100.0 - discount)).round() / 100.0,
    portion_size: "Regular".to_string(),
    time_remaining: minutes,
    stock_quantity: 5,
    features: features.iter().map(|f| f.to_string()).collect(),
    images: vec![format!("/images/meals/{}.jpg", name.to_lowercase().replace(' ', "-"))],
    restaurant: restaurant.clone(),
  };

  vec![
    meal("Mushroom Risotto", "Italian", 16.0, 50.0, 120, &["Vegetarian", "Gluten Free"]),
    meal("Chicken Tikka Bowl", "Indian", 14.0, 40.0, 90, &["Spicy"]),
    meal("Falafel Wrap", "Middle Eastern", 10.0, 60.0, 45, &["Vegan"]),
  ]
}
