//! Handlers for `/users` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `POST`   | `/users`      | Body: `{"email":"..."}`; 422 if the email is taken |
//! | `GET`    | `/users/{id}` | User with resolved consents; 404 if not found |
//! | `DELETE` | `/users/{id}` | Removes the user and all their consent events |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use consents_core::{store::UserStore, user::User};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, validate};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateUserBody {
  pub email: Option<String>,
}

impl CreateUserBody {
  /// Return the validated email, or every field-level problem.
  pub fn validate(&self) -> Result<&str, Vec<String>> {
    let email = self.email.as_deref().unwrap_or_default();
    match validate::email("email", email) {
      Some(problem) => Err(vec![problem]),
      None => Ok(email),
    }
  }
}

/// `POST /users` — returns 201 + the new [`User`] with no consents.
pub async fn create<U>(
  State(store): State<Arc<U>>,
  body: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  U: UserStore,
{
  let Json(body) = body?;
  let email = body.validate().map_err(ApiError::Validation)?;

  let user = store
    .create_user(email)
    .await
    .map_err(|e| ApiError::CreateUser(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn detail<U>(
  State(store): State<Arc<U>>,
  Path(id): Path<String>,
) -> Result<Json<User>, ApiError>
where
  U: UserStore,
{
  let user = store
    .user_detail(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::UserNotFound)?;
  Ok(Json(user))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}` — 204 whether or not the user existed.
pub async fn delete<U>(
  State(store): State<Arc<U>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  U: UserStore,
{
  store
    .delete_user(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
