//! Error type for `consents-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] consents_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The UNIQUE constraint on `users.email` rejected an insert.
  #[error("email already registered: {0}")]
  DuplicateEmail(String),
}

impl Error {
  pub fn is_duplicate_email(&self) -> bool { matches!(self, Self::DuplicateEmail(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Whether `err` is a UNIQUE constraint violation (as opposed to a primary
/// key, foreign key, or NOT NULL violation).
pub(crate) fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}
