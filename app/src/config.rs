// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Which persistence backend the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  Postgres,
  Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  pub storage_backend: StorageBackend,
  /// Required for the postgres backend, ignored by the memory one.
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub database_connect_timeout: Duration,

  /// Shared HS256 secret of the auth provider that signs session tokens.
  pub session_secret: String,

  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any key lookup; `from_env` passes the process
  /// environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let storage_backend = match get_or("STORAGE_BACKEND", "postgres").to_lowercase().as_str() {
      "postgres" => StorageBackend::Postgres,
      "memory" => StorageBackend::Memory,
      other => {
        return Err(AppError::Config(format!(
          "Invalid STORAGE_BACKEND '{}': expected 'postgres' or 'memory'",
          other
        )))
      }
    };

    let database_url = lookup("DATABASE_URL");
    if storage_backend == StorageBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required by the postgres backend)".to_string(),
      ));
    }

    let database_max_connections = get_or("DATABASE_MAX_CONNECTIONS", "5")
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;
    let database_connect_timeout = get_or("DATABASE_CONNECT_TIMEOUT_SECS", "5")
      .parse::<u64>()
      .map(Duration::from_secs)
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_CONNECT_TIMEOUT_SECS: {}", e)))?;

    let session_secret = lookup("SESSION_SECRET")
      .filter(|s| !s.is_empty())
      .ok_or_else(|| AppError::Config("Missing environment variable 'SESSION_SECRET'".to_string()))?;

    let seed_db = get_or("SEED_DB", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!(?storage_backend, "Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      storage_backend,
      database_url,
      database_max_connections,
      database_connect_timeout,
      session_secret,
      seed_db,
    })
  }
}
