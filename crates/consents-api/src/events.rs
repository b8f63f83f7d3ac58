//! Handler for `POST /events`.
//!
//! Body:
//!
//! ```json
//! { "user": { "id": "<uuid>" },
//!   "consents": [ { "id": "email", "enabled": true }, { "id": "sms", "enabled": false } ] }
//! ```
//!
//! The whole batch is recorded atomically; 201 on success.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
};
use consents_core::{consent::NewConsent, store::EventStore};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, validate};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserRef {
  pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConsentBody {
  pub id:      Option<String>,
  #[serde(default)]
  pub enabled: bool,
}

/// JSON body accepted by `POST /events`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RecordConsentsBody {
  pub user:     Option<UserRef>,
  pub consents: Option<Vec<ConsentBody>>,
}

impl RecordConsentsBody {
  /// Return the target user id and the typed batch, or every field-level
  /// problem found.
  pub fn validate(&self) -> Result<(&str, Vec<NewConsent>), Vec<String>> {
    let mut problems = Vec::new();

    let user_id = match &self.user {
      None => {
        problems.push(validate::blank("user"));
        ""
      }
      Some(user) => {
        let id = user.id.as_deref().unwrap_or_default();
        problems.extend(validate::uuid("user.id", id));
        id
      }
    };

    let mut batch = Vec::new();
    match self.consents.as_deref() {
      None | Some([]) => problems.push(validate::blank("consents")),
      Some(consents) => {
        for (i, consent) in consents.iter().enumerate() {
          let field = format!("consents[{i}].id");
          match validate::consent_kind(&field, consent.id.as_deref().unwrap_or_default()) {
            Ok(kind) => batch.push(NewConsent::new(kind, consent.enabled)),
            Err(problem) => problems.push(problem),
          }
        }
      }
    }

    if problems.is_empty() { Ok((user_id, batch)) } else { Err(problems) }
  }
}

/// `POST /events`
pub async fn record<E>(
  State(store): State<Arc<E>>,
  body: Result<Json<RecordConsentsBody>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  E: EventStore,
{
  let Json(body) = body?;
  let (user_id, batch) = body.validate().map_err(ApiError::Validation)?;

  store
    .record_consents(user_id, batch)
    .await
    .map_err(|e| ApiError::RecordConsents(Box::new(e)))?;
  Ok(StatusCode::CREATED)
}
