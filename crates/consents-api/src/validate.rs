//! Field-level checks shared by the request bodies.
//!
//! Each check returns a message of the form `"<field>: <problem>"`; callers
//! collect every failing field before rejecting the request.

use consents_core::consent::ConsentKind;
use uuid::Uuid;

pub(crate) fn blank(field: &str) -> String { format!("{field}: cannot be blank") }

/// `Some(message)` unless `value` is a plausible email address.
pub(crate) fn email(field: &str, value: &str) -> Option<String> {
  if value.is_empty() {
    return Some(blank(field));
  }
  if !is_valid_email(value) {
    return Some(format!("{field}: must be a valid email address"));
  }
  None
}

pub(crate) fn uuid(field: &str, value: &str) -> Option<String> {
  if value.is_empty() {
    return Some(blank(field));
  }
  if Uuid::parse_str(value).is_err() {
    return Some(format!("{field}: must be a valid UUID"));
  }
  None
}

pub(crate) fn consent_kind(field: &str, value: &str) -> Result<ConsentKind, String> {
  if value.is_empty() {
    return Err(blank(field));
  }
  value.parse().map_err(|_| {
    let known: Vec<&str> = ConsentKind::ALL.into_iter().map(ConsentKind::as_str).collect();
    format!("{field}: must be one of {}", known.join(", "))
  })
}

fn is_valid_email(value: &str) -> bool {
  if value.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = value.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && domain.split('.').all(|label| !label.is_empty())
}
