// app/src/pipelines/common_steps.rs

use crate::errors::Result;
use crate::pipelines::contexts::ActionContext;
use crate::services::view_cache::InvalidationScope;
use crate::state::AppState;
use mealsaver_flow::{ContextData, StepControl};
use tracing::{debug, instrument};

/// First step of every action: the caller must be signed in.
#[instrument(name = "common_step::require_session", skip_all, err(Display))]
pub async fn require_session<T: ActionContext>(ctx_data: ContextData<T>) -> Result<StepControl> {
  let user_id = {
    let guard = ctx_data.read();
    guard.session().require_user()?.user_id.clone()
  };
  debug!(%user_id, "Session present.");
  Ok(StepControl::Continue)
}

/// Drops cached renderings of `targets` so the next read sees the mutation.
pub fn invalidate_views(app_state: &AppState, targets: &[(&str, InvalidationScope)]) {
  for (path, scope) in targets {
    app_state.views.invalidate(path, *scope);
  }
}
