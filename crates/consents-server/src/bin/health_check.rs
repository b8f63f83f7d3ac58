//! Container health probe.
//!
//! Loads the same configuration as the server, requests `GET /` on the
//! loopback interface, and exits non-zero unless the answer is `200 OK`.

use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use consents_server::ServerConfig;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(author, version, about = "Probe a running consents server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Give up after this many seconds.
  #[arg(long, default_value_t = 5)]
  timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
  consents_server::init_tracing(LevelFilter::WARN);

  let cli = Cli::parse();
  match probe(&cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("health check failed: {e:#}");
      ExitCode::FAILURE
    }
  }
}

async fn probe(cli: &Cli) -> anyhow::Result<()> {
  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;
  let url = format!("http://127.0.0.1:{}/", cfg.port);

  let client = reqwest::Client::builder()
    .timeout(Duration::from_secs(cli.timeout_secs))
    .build()
    .context("failed to build HTTP client")?;

  let resp = client
    .get(&url)
    .send()
    .await
    .with_context(|| format!("GET {url}"))?;

  anyhow::ensure!(
    resp.status() == reqwest::StatusCode::OK,
    "GET {url} returned {}",
    resp.status()
  );
  Ok(())
}
