//! Handler for `GET /`.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
  pub result:    String,
  /// RFC 3339, second precision.
  pub timestamp: String,
}

/// `GET /` — liveness probe; always `{"result":"ok", ...}`.
pub async fn handler() -> Json<HealthReport> {
  Json(HealthReport {
    result:    "ok".to_owned(),
    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
  })
}
