//! User — the identity record that consent events hang off.

use serde::{Deserialize, Serialize};

use crate::consent::Consent;

/// A user together with their resolved consent state.
///
/// `consents` holds at most one entry per kind, in
/// [`ConsentKind::ALL`](crate::consent::ConsentKind::ALL) order. Kinds the
/// user never decided on are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       String,
  pub email:    String,
  pub consents: Vec<Consent>,
}

impl User {
  /// A freshly created user, before any consent event exists.
  pub fn new(id: String, email: String) -> Self {
    Self { id, email, consents: Vec::new() }
  }
}
