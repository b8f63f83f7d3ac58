//! Consent kinds, consent events, and resolved consent state.
//!
//! A consent event is an immutable claim that a user switched a consent kind
//! on or off at a point in time. Events are never updated; the current state
//! of a kind is whichever event for it was recorded last.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// A category a user can grant or deny consent for.
///
/// The set is closed. Adding a variant also requires adding it to
/// [`ConsentKind::ALL`], which fixes the order of resolved consents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentKind {
  Email,
  Sms,
}

impl ConsentKind {
  /// Every known kind, in resolution order.
  pub const ALL: [ConsentKind; 2] = [ConsentKind::Email, ConsentKind::Sms];

  pub fn as_str(self) -> &'static str {
    match self {
      ConsentKind::Email => "email",
      ConsentKind::Sms => "sms",
    }
  }

  /// Position of this kind within [`ConsentKind::ALL`].
  pub fn position(self) -> usize {
    ConsentKind::ALL
      .iter()
      .position(|k| *k == self)
      .unwrap_or(ConsentKind::ALL.len())
  }
}

impl fmt::Display for ConsentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ConsentKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ConsentKind::ALL
      .into_iter()
      .find(|k| k.as_str() == s)
      .ok_or_else(|| Error::UnknownConsentKind(s.to_owned()))
  }
}

// ─── Resolved state ──────────────────────────────────────────────────────────

/// The resolved state of one consent kind for a user.
///
/// Serialises as `{"id": "email", "enabled": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
  pub id:      ConsentKind,
  pub enabled: bool,
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// One entry of a consent batch, before the store assigns identity and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewConsent {
  pub kind:    ConsentKind,
  pub enabled: bool,
}

impl NewConsent {
  pub fn new(kind: ConsentKind, enabled: bool) -> Self { Self { kind, enabled } }
}

/// A persisted consent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentEvent {
  pub event_id:   String,
  pub user_id:    String,
  pub kind:       ConsentKind,
  pub enabled:    bool,
  /// Server-assigned; orders events when resolving state.
  pub created_at: DateTime<Utc>,
}
