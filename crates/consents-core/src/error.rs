//! Error types for `consents-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown consent kind: {0:?}")]
  UnknownConsentKind(String),

  #[error("a consent batch must contain at least one consent")]
  EmptyBatch,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
