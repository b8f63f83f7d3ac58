//! consents-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `CONSENTS_*` environment variables, opens the SQLite store (creating the
//! schema if needed), and serves the REST API until SIGINT or SIGTERM.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use consents_server::ServerConfig;
use consents_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, signal, sync::oneshot};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(author, version, about = "Consents API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  consents_server::init_tracing(LevelFilter::INFO);

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = SqliteStore::open(&server_cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.database_path))?;

  let app = consents_server::router(store);
  let address = server_cfg.address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Listening on http://{address}");

  let (stop_tx, stop_rx) = oneshot::channel::<()>();
  let mut server = tokio::spawn(
    axum::serve(listener, app)
      .with_graceful_shutdown(async move {
        let _ = stop_rx.await;
      })
      .into_future(),
  );

  tokio::select! {
    joined = &mut server => {
      return joined.context("server task failed")?.context("server error");
    }
    () = shutdown_signal() => {}
  }

  let _ = stop_tx.send(());
  let timeout = server_cfg.shutdown_timeout();
  match tokio::time::timeout(timeout, server).await {
    Ok(joined) => joined.context("server task failed")?.context("server error")?,
    Err(_) => tracing::warn!(?timeout, "in-flight requests did not finish, exiting anyway"),
  }

  tracing::info!("Server stopped");
  Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to install Ctrl+C handler");
      std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
        tracing::info!("Received terminate signal, shutting down");
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
}
