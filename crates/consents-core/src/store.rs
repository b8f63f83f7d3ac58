//! The `UserStore` and `EventStore` capability traits.
//!
//! Traits are implemented by storage backends (e.g. `consents-store-sqlite`).
//! The HTTP layer depends on these abstractions, not on any concrete backend,
//! so tests can substitute a fake.

use std::future::Future;

use crate::{consent::NewConsent, user::User};

/// User identity records and their resolved consent state.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create and persist a user with a generated id.
  ///
  /// The returned user has no consents. Fails if `email` is already taken.
  fn create_user<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// Delete a user and every consent event recorded for them, atomically.
  ///
  /// Deleting an id that does not exist succeeds.
  fn delete_user<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Look up a user and resolve their current consent state.
  /// Returns `None` if no user has this id.
  fn user_detail<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;
}

/// Append-only consent event log.
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record a batch of consent decisions for `user_id`.
  ///
  /// The batch is all-or-nothing: if any event fails to persist, none do.
  /// An empty batch is rejected.
  fn record_consents<'a>(
    &'a self,
    user_id: &'a str,
    consents: Vec<NewConsent>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
