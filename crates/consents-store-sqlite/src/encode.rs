//! Conversions between domain types and the plain-text column encodings.
//!
//! Timestamps are RFC 3339 strings in UTC with a fixed nanosecond width, so
//! ordering the text orders the instants. Consent kinds are their lowercase
//! names.

use chrono::{DateTime, SecondsFormat, Utc};
use consents_core::consent::{Consent, ConsentKind};

use crate::Result;

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// A resolved-consent row as read from SQLite, before kind decoding.
pub struct RawConsent {
  pub consent_id: String,
  pub enabled:    bool,
}

impl RawConsent {
  pub fn into_consent(self) -> Result<Consent> {
    let id: ConsentKind = self.consent_id.parse()?;
    Ok(Consent { id, enabled: self.enabled })
  }
}
