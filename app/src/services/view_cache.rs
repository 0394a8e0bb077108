// app/src/services/view_cache.rs

//! Process-local cache of rendered read views, keyed by path and viewer.
//! Mutations invalidate by path so the next read renders fresh data.

use crate::errors::Result;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, info};

/// How far an invalidation reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidationScope {
  /// Only the exact path.
  Page,
  /// The path and every path below it.
  Layout,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ViewKey {
  path: String,
  viewer: Option<String>,
}

impl InvalidationScope {
  fn covers(self, invalidated: &str, path: &str) -> bool {
    match self {
      InvalidationScope::Page => path == invalidated,
      InvalidationScope::Layout => {
        let base = invalidated.trim_end_matches('/');
        path == invalidated || path == base || path.starts_with(&format!("{}/", base))
      }
    }
  }
}

#[derive(Default)]
struct CacheState {
  entries: HashMap<ViewKey, Value>,
  /// Bumped by every invalidation.
  generation: u64,
  /// Generation of the latest invalidation of each (path, scope).
  invalidated_at: HashMap<(String, InvalidationScope), u64>,
}

impl CacheState {
  /// True when an invalidation reaching `path` happened after `since`.
  fn invalidated_since(&self, path: &str, since: u64) -> bool {
    self
      .invalidated_at
      .iter()
      .any(|((invalidated, scope), generation)| *generation > since && scope.covers(invalidated, path))
  }
}

#[derive(Default)]
pub struct ViewCache {
  state: RwLock<CacheState>,
}

impl ViewCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, path: &str, viewer: Option<&str>) -> Option<Value> {
    self.state.read().entries.get(&key(path, viewer)).cloned()
  }

  pub fn put(&self, path: &str, viewer: Option<&str>, rendered: Value) {
    self.state.write().entries.insert(key(path, viewer), rendered);
  }

  /// Returns the cached rendering, or renders, stores and returns it.
  /// Failed renders are not cached, and neither is a render that an
  /// invalidation of its path overtook while it was running.
  pub async fn get_or_render<F, Fut>(&self, path: &str, viewer: Option<&str>, render: F) -> Result<Value>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
  {
    if let Some(hit) = self.get(path, viewer) {
      debug!(path, "View cache hit.");
      return Ok(hit);
    }
    let started_at = self.state.read().generation;
    let rendered = render().await?;

    let mut state = self.state.write();
    if state.invalidated_since(path, started_at) {
      debug!(path, "Render overtaken by an invalidation; not caching it.");
    } else {
      state.entries.insert(key(path, viewer), rendered.clone());
    }
    Ok(rendered)
  }

  /// Drops every cached rendering under `path` for all viewers. Returns how
  /// many entries went away.
  pub fn invalidate(&self, path: &str, scope: InvalidationScope) -> usize {
    let mut state = self.state.write();
    state.generation += 1;
    let generation = state.generation;
    state.invalidated_at.insert((path.to_string(), scope), generation);

    let before = state.entries.len();
    state.entries.retain(|k, _| !scope.covers(path, &k.path));
    let removed = before - state.entries.len();
    info!(path, ?scope, removed, "Invalidated cached views.");
    removed
  }

  pub fn len(&self) -> usize {
    self.state.read().entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

fn key(path: &str, viewer: Option<&str>) -> ViewKey {
  ViewKey {
    path: path.to_string(),
    viewer: viewer.map(str::to_string),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::errors::AppError;
  use serde_json::json;

  #[test]
  fn layout_scope_reaches_nested_paths_only() {
    let cache = ViewCache::new();
    cache.put("/messages", Some("u1"), json!(1));
    cache.put("/messages/unread-count", Some("u1"), json!(2));
    cache.put("/messages-archive", Some("u1"), json!(3));
    cache.put("/meals", None, json!(4));

    assert_eq!(cache.invalidate("/messages", InvalidationScope::Layout), 2);
    assert!(cache.get("/messages-archive", Some("u1")).is_some());
    assert!(cache.get("/meals", None).is_some());
  }

  #[test]
  fn page_scope_is_exact() {
    let cache = ViewCache::new();
    cache.put("/", None, json!("home"));
    cache.put("/meals", None, json!("list"));
    assert_eq!(cache.invalidate("/", InvalidationScope::Page), 1);
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn entries_are_per_viewer() {
    let cache = ViewCache::new();
    cache.put("/messages", Some("u1"), json!("u1 inbox"));
    assert!(cache.get("/messages", Some("u2")).is_none());
    assert!(cache.get("/messages", None).is_none());
  }

  #[tokio::test]
  async fn renders_once_until_invalidated() {
    let cache = ViewCache::new();
    let first = cache.get_or_render("/meals", None, || async { Ok::<_, AppError>(json!(["a"])) }).await.unwrap();
    let second = cache.get_or_render("/meals", None, || async { Ok::<_, AppError>(json!(["b"])) }).await.unwrap();
    assert_eq!(first, second);

    cache.invalidate("/meals", InvalidationScope::Layout);
    let third = cache.get_or_render("/meals", None, || async { Ok::<_, AppError>(json!(["c"])) }).await.unwrap();
    assert_eq!(third, json!(["c"]));
  }

  #[tokio::test]
  async fn render_overtaken_by_invalidation_is_not_cached() {
    let cache = ViewCache::new();
    let stale = cache
      .get_or_render("/messages/unread-count", Some("u1"), || async {
        let before_mutation = json!({ "count": 1 });
        cache.invalidate("/messages", InvalidationScope::Layout);
        Ok::<_, AppError>(before_mutation)
      })
      .await
      .unwrap();
    assert_eq!(stale, json!({ "count": 1 }));
    assert!(cache.get("/messages/unread-count", Some("u1")).is_none());

    // Unrelated paths still cache normally.
    cache.get_or_render("/meals", None, || async { Ok::<_, AppError>(json!([])) }).await.unwrap();
    assert!(cache.get("/meals", None).is_some());
  }

  #[tokio::test]
  async fn failed_render_is_not_cached() {
    let cache = ViewCache::new();
    let err = cache
      .get_or_render("/meals", None, || async { Err::<serde_json::Value, _>(AppError::Connection("down".to_string())) })
      .await;
    assert!(err.is_err());
    assert!(cache.is_empty());
  }
}
