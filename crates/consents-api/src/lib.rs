//! JSON REST API for the consents service.
//!
//! Exposes an axum [`Router`] backed by any [`UserStore`] and [`EventStore`].
//! TLS, request logging and process lifecycle are the caller's
//! responsibility.
//!
//! | Method   | Path          | Success           |
//! |----------|---------------|-------------------|
//! | `GET`    | `/`           | 200 health report |
//! | `POST`   | `/users`      | 201 + user        |
//! | `GET`    | `/users/{id}` | 200 + user        |
//! | `DELETE` | `/users/{id}` | 204               |
//! | `POST`   | `/events`     | 201               |

pub mod error;
pub mod events;
pub mod health;
pub mod users;
mod validate;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use consents_core::store::{EventStore, UserStore};

pub use error::ApiError;

/// Build the API router.
///
/// The returned `Router<()>` can be nested or merged into any parent router
/// regardless of its own state type.
pub fn api_router<U, E>(user_store: Arc<U>, event_store: Arc<E>) -> Router<()>
where
  U: UserStore + 'static,
  E: EventStore + 'static,
{
  let user_routes = Router::new()
    .route("/users", post(users::create::<U>))
    .route("/users/{id}", get(users::detail::<U>).delete(users::delete::<U>))
    .with_state(user_store);

  let event_routes = Router::new()
    .route("/events", post(events::record::<E>))
    .with_state(event_store);

  Router::new()
    .route("/", get(health::handler))
    .merge(user_routes)
    .merge(event_routes)
}

#[cfg(test)]
mod tests;
