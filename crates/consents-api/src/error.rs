//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Clients only ever see a fixed vocabulary of messages; the underlying
//! store error is logged and dropped.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("malformed request body: {0}")]
  Malformed(#[from] JsonRejection),

  /// One message per failing field.
  #[error("validation failed: {}", .0.join("; "))]
  Validation(Vec<String>),

  #[error("could not create user: {0}")]
  CreateUser(#[source] BoxError),

  #[error("could not record consents: {0}")]
  RecordConsents(#[source] BoxError),

  #[error("user not found")]
  UserNotFound,

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

/// Body of every error response: `{"errors": [...]}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub errors: Vec<String>,
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::Malformed(_)
      | ApiError::Validation(_)
      | ApiError::CreateUser(_)
      | ApiError::RecordConsents(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::UserNotFound => StatusCode::NOT_FOUND,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let errors = match self {
      ApiError::Malformed(rejection) => {
        tracing::debug!(%rejection, "rejected request body");
        vec!["Malformed request body".to_owned()]
      }
      ApiError::Validation(messages) => messages,
      ApiError::CreateUser(e) => {
        // Duplicate emails and genuine failures share one public message.
        tracing::warn!(error = %e, "user creation failed");
        vec!["Email already exists".to_owned()]
      }
      ApiError::RecordConsents(e) => {
        tracing::warn!(error = %e, "consent recording failed");
        vec!["Invalid request".to_owned()]
      }
      ApiError::UserNotFound => vec!["User not found".to_owned()],
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        vec!["Internal server error".to_owned()]
      }
    };
    (status, Json(ErrorBody { errors })).into_response()
  }
}
