// app/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::session::SessionResolver;
use crate::services::store::Gateway;
use crate::services::view_cache::ViewCache;
use mealsaver_flow::ActionRegistry;
use std::sync::Arc;

/// Shared by every handler and carried into each action's context.
#[derive(Clone)]
pub struct AppState {
  pub gateway: Gateway,
  pub actions: Arc<ActionRegistry<AppError>>,
  pub sessions: Arc<SessionResolver>,
  pub views: Arc<ViewCache>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the state and registers every action pipeline.
  pub fn new(config: Arc<AppConfig>, gateway: Gateway) -> Self {
    let actions = Arc::new(ActionRegistry::<AppError>::new());
    pipelines::register_all_pipelines(&actions);

    Self {
      gateway,
      actions,
      sessions: Arc::new(SessionResolver::new(&config.session_secret)),
      views: Arc::new(ViewCache::new()),
      config,
    }
  }
}
