//! Router tests: error mapping against a fake store, and end-to-end flows
//! against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use consents_core::{
  consent::{Consent, ConsentKind, NewConsent},
  store::{EventStore, UserStore},
  user::User,
};
use consents_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

const USER_ID: &str = "7b5a3155-7a73-42de-b87e-23f50a10180a";
const EMAIL: &str = "user@example.com";

// ─── Fake store ──────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("fake store failure")]
struct FakeError;

/// Returns `user` from every read and create, or fails every call.
#[derive(Default)]
struct FakeStore {
  user: Option<User>,
  fail: bool,
}

impl FakeStore {
  fn failing() -> Self { Self { user: None, fail: true } }

  fn with_user(user: User) -> Self { Self { user: Some(user), fail: false } }

  fn outcome<T>(&self, value: T) -> Result<T, FakeError> {
    if self.fail { Err(FakeError) } else { Ok(value) }
  }
}

impl UserStore for FakeStore {
  type Error = FakeError;

  async fn create_user(&self, email: &str) -> Result<User, FakeError> {
    let user = self
      .user
      .clone()
      .unwrap_or_else(|| User::new(USER_ID.to_owned(), email.to_owned()));
    self.outcome(user)
  }

  async fn delete_user(&self, _id: &str) -> Result<(), FakeError> { self.outcome(()) }

  async fn user_detail(&self, _id: &str) -> Result<Option<User>, FakeError> {
    self.outcome(self.user.clone())
  }
}

impl EventStore for FakeStore {
  type Error = FakeError;

  async fn record_consents(
    &self,
    _user_id: &str,
    _consents: Vec<NewConsent>,
  ) -> Result<(), FakeError> {
    self.outcome(())
  }
}

fn fake_app(store: FakeStore) -> Router {
  let store = Arc::new(store);
  api_router(store.clone(), store)
}

async fn sqlite_app() -> Router {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  api_router(store.clone(), store)
}

// ─── Request helpers ─────────────────────────────────────────────────────────

async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if body.is_some() {
    builder = builder.header(header::CONTENT_TYPE, "application/json");
  }
  let req = builder
    .body(body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty))
    .unwrap();

  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
  send(app, "POST", uri, Some(&body.to_string())).await
}

fn first_error(body: &Value) -> &str { body["errors"][0].as_str().unwrap_or_default() }

fn valid_events_body(user_id: &str) -> Value {
  json!({
    "user": { "id": user_id },
    "consents": [
      { "id": "email", "enabled": true },
      { "id": "sms", "enabled": false },
    ],
  })
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok_with_timestamp() {
  let (status, body) = send(fake_app(FakeStore::default()), "GET", "/", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["result"], "ok");
  let ts = body["timestamp"].as_str().unwrap();
  assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "timestamp: {ts}");
}

// ─── POST /users ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_returns_201_and_user() {
  let (status, body) =
    post_json(fake_app(FakeStore::default()), "/users", json!({ "email": EMAIL })).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body, json!({ "id": USER_ID, "email": EMAIL, "consents": [] }));
}

#[tokio::test]
async fn create_user_malformed_body_returns_422() {
  let (status, body) =
    send(fake_app(FakeStore::default()), "POST", "/users", Some("malformed json")).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "Malformed request body");
}

#[tokio::test]
async fn create_user_without_json_content_type_is_malformed() {
  let req = Request::builder()
    .method("POST")
    .uri("/users")
    .body(Body::from(json!({ "email": EMAIL }).to_string()))
    .unwrap();
  let resp = fake_app(FakeStore::default()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_user_invalid_email_returns_validation_errors() {
  let (status, body) =
    post_json(fake_app(FakeStore::default()), "/users", json!({ "email": "foo-bar" })).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "email: must be a valid email address");
}

#[tokio::test]
async fn create_user_missing_email_returns_validation_errors() {
  let (status, body) = post_json(fake_app(FakeStore::default()), "/users", json!({})).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "email: cannot be blank");
}

#[tokio::test]
async fn create_user_store_failure_reports_email_exists() {
  let (status, body) =
    post_json(fake_app(FakeStore::failing()), "/users", json!({ "email": EMAIL })).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "Email already exists");
}

// ─── DELETE /users/{id} ──────────────────────────────────────────────────────

#[tokio::test]
async fn delete_user_returns_204() {
  let (status, body) =
    send(fake_app(FakeStore::default()), "DELETE", &format!("/users/{USER_ID}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn delete_user_store_failure_returns_500() {
  let (status, body) =
    send(fake_app(FakeStore::failing()), "DELETE", &format!("/users/{USER_ID}"), None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(first_error(&body), "Internal server error");
}

// ─── GET /users/{id} ─────────────────────────────────────────────────────────

#[tokio::test]
async fn user_detail_returns_user_with_consents() {
  let user = User {
    id:       USER_ID.to_owned(),
    email:    EMAIL.to_owned(),
    consents: vec![
      Consent { id: ConsentKind::Email, enabled: true },
      Consent { id: ConsentKind::Sms, enabled: false },
    ],
  };
  let (status, body) =
    send(fake_app(FakeStore::with_user(user)), "GET", &format!("/users/{USER_ID}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({
      "id": USER_ID,
      "email": EMAIL,
      "consents": [
        { "id": "email", "enabled": true },
        { "id": "sms", "enabled": false },
      ],
    })
  );
}

#[tokio::test]
async fn user_detail_missing_returns_404() {
  let (status, body) =
    send(fake_app(FakeStore::default()), "GET", &format!("/users/{USER_ID}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(first_error(&body), "User not found");
}

#[tokio::test]
async fn user_detail_store_failure_returns_500() {
  let (status, body) =
    send(fake_app(FakeStore::failing()), "GET", &format!("/users/{USER_ID}"), None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(first_error(&body), "Internal server error");
}

// ─── POST /events ────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_consents_returns_201() {
  let (status, body) =
    post_json(fake_app(FakeStore::default()), "/events", valid_events_body(USER_ID)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn record_consents_malformed_body_returns_422() {
  let (status, body) =
    send(fake_app(FakeStore::default()), "POST", "/events", Some("malformed json")).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "Malformed request body");
}

#[tokio::test]
async fn record_consents_reports_every_invalid_field() {
  let (status, body) = post_json(
    fake_app(FakeStore::default()),
    "/events",
    json!({
      "user": { "id": "foo" },
      "consents": [
        { "id": "bar", "enabled": true },
        { "id": "baz", "enabled": false },
      ],
    }),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(
    body["errors"],
    json!([
      "user.id: must be a valid UUID",
      "consents[0].id: must be one of email, sms",
      "consents[1].id: must be one of email, sms",
    ])
  );
}

#[tokio::test]
async fn record_consents_requires_user_and_consents() {
  let (status, body) = post_json(fake_app(FakeStore::default()), "/events", json!({})).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["errors"], json!(["user: cannot be blank", "consents: cannot be blank"]));
}

#[tokio::test]
async fn record_consents_rejects_empty_batch() {
  let (status, body) = post_json(
    fake_app(FakeStore::default()),
    "/events",
    json!({ "user": { "id": USER_ID }, "consents": [] }),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "consents: cannot be blank");
}

#[tokio::test]
async fn record_consents_store_failure_reports_invalid_request() {
  let (status, body) =
    post_json(fake_app(FakeStore::failing()), "/events", valid_events_body(USER_ID)).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "Invalid request");
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn consent_lifecycle_against_sqlite() {
  let app = sqlite_app().await;

  let (status, created) =
    post_json(app.clone(), "/users", json!({ "email": "a@b.com" })).await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["id"].as_str().unwrap().to_owned();
  assert_eq!(created["consents"], json!([]));

  let (status, _) = post_json(app.clone(), "/events", valid_events_body(&id)).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, _) = post_json(
    app.clone(),
    "/events",
    json!({ "user": { "id": id }, "consents": [{ "id": "email", "enabled": false }] }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, detail) = send(app.clone(), "GET", &format!("/users/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    detail,
    json!({
      "id": id,
      "email": "a@b.com",
      "consents": [
        { "id": "email", "enabled": false },
        { "id": "sms", "enabled": false },
      ],
    })
  );

  let (status, _) = send(app.clone(), "DELETE", &format!("/users/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, body) = send(app, "GET", &format!("/users/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(first_error(&body), "User not found");
}

#[tokio::test]
async fn duplicate_email_against_sqlite() {
  let app = sqlite_app().await;

  let (status, first) = post_json(app.clone(), "/users", json!({ "email": EMAIL })).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = post_json(app.clone(), "/users", json!({ "email": EMAIL })).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "Email already exists");

  let id = first["id"].as_str().unwrap();
  let (status, detail) = send(app, "GET", &format!("/users/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(detail["email"], EMAIL);
}

#[tokio::test]
async fn consents_for_unknown_user_are_rejected() {
  let app = sqlite_app().await;
  let (status, body) = post_json(app, "/events", valid_events_body(USER_ID)).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(first_error(&body), "Invalid request");
}
