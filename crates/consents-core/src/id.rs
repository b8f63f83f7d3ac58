//! Record identifiers.

use uuid::Uuid;

/// Generate a fresh primary key: a random UUID rendered as lowercase,
/// hyphenated text.
pub fn generate_id() -> String {
  Uuid::new_v4().hyphenated().to_string().to_lowercase()
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn ids_are_lowercase_uuids() {
    let id = generate_id();
    assert_eq!(id, id.to_lowercase());
    assert_eq!(id.len(), 36);
    assert!(Uuid::parse_str(&id).is_ok());
  }

  #[test]
  fn ids_do_not_repeat() {
    let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
    assert_eq!(ids.len(), 1000);
  }
}
