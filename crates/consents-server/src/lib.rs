//! Process wiring for the consents service: configuration, tracing, and the
//! top-level HTTP router.

use std::{path::Path, sync::Arc, time::Duration};

use axum::Router;
use config::{Config, ConfigBuilder, ConfigError, builder::DefaultState};
use consents_core::store::{EventStore, UserStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Prefix of environment variables that override the config file,
/// e.g. `CONSENTS_PORT=9000`.
pub const ENV_PREFIX: &str = "CONSENTS";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  #[serde(default = "default_database_path")]
  pub database_path:         String,
  /// How long in-flight requests may run after a shutdown signal.
  #[serde(default = "default_shutdown_timeout_secs")]
  pub shutdown_timeout_secs: u64,
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_database_path() -> String { "consents.db".to_owned() }

fn default_shutdown_timeout_secs() -> u64 { 10 }

impl ServerConfig {
  /// Layer an optional TOML file at `path` under `CONSENTS_*` variables.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    Self::from_builder(
      Config::builder()
        .add_source(config::File::from(path.as_ref()).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX)),
    )
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
    builder.build()?.try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn shutdown_timeout(&self) -> Duration { Duration::from_secs(self.shutdown_timeout_secs) }
}

// ─── Tracing ──────────────────────────────────────────────────────────────────

/// Install the global fmt subscriber. `RUST_LOG` overrides `default`.
pub fn init_tracing(default: LevelFilter) {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy(),
    )
    .init();
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with per-request tracing.
pub fn router<S>(store: S) -> Router
where
  S: UserStore + EventStore + 'static,
{
  let store = Arc::new(store);
  consents_api::api_router(store.clone(), store).layer(TraceLayer::new_for_http())
}
