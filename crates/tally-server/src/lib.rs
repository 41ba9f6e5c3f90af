//! HTTP server wiring for Tally.
//!
//! Mounts the JSON API under `/api`, adds request tracing and optional CORS for
//! the browser dashboard, and owns the daily recurrence scheduler.

pub mod scheduler;

use std::path::{Path, PathBuf};

use axum::{Router, http::HeaderValue};
use chrono::NaiveTime;
use serde::Deserialize;
use tally_api::AppState;
use tally_core::store::FinanceStore;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to load configuration: {0}")]
  Load(#[from] config::ConfigError),

  #[error("recurrence_time must be HH:MM, got {0:?}")]
  RecurrenceTime(String),

  #[error("cors_origin is not a valid header value: {0:?}")]
  CorsOrigin(String),
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `TALLY_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Browser origin allowed to call the API, e.g. the dashboard's dev server.
  pub cors_origin:        Option<String>,
  pub recurrence_enabled: bool,
  /// UTC wall-clock time of the daily recurrence pass, `HH:MM`.
  pub recurrence_time:    String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".to_string(),
      port:               5000,
      store_path:         PathBuf::from("tally.db"),
      cors_origin:        None,
      recurrence_enabled: true,
      recurrence_time:    "00:00".to_string(),
    }
  }
}

impl ServerConfig {
  /// Load from an optional TOML file at `path`, overridden by `TALLY_*`
  /// environment variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TALLY"))
      .build()?;
    let cfg: ServerConfig = settings.try_deserialize()?;
    cfg.recurrence_time()?;
    Ok(cfg)
  }

  pub fn recurrence_time(&self) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(&self.recurrence_time, "%H:%M")
      .map_err(|_| ConfigError::RecurrenceTime(self.recurrence_time.clone()))
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: the API under `/api` plus tracing and,
/// when configured, CORS.
pub fn router<S>(state: AppState<S>, cfg: &ServerConfig) -> Result<Router, ConfigError>
where
  S: FinanceStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut app = Router::new()
    .nest("/api", tally_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  if let Some(origin) = &cfg.cors_origin {
    let origin = HeaderValue::from_str(origin)
      .map_err(|_| ConfigError::CorsOrigin(origin.clone()))?;
    app = app.layer(
      CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any),
    );
  }

  Ok(app)
}
