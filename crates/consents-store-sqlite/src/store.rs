//! [`SqliteStore`] — the SQLite implementation of [`UserStore`] and
//! [`EventStore`].

use std::path::Path;

use chrono::Utc;
use consents_core::{
  consent::{ConsentEvent, ConsentKind, NewConsent},
  id::generate_id,
  store::{EventStore, UserStore},
  user::User,
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use crate::{
  encode::{RawConsent, encode_dt},
  error::is_unique_violation,
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A consents store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert fully-built events inside a single transaction.
  ///
  /// The first failing insert aborts the closure; dropping the uncommitted
  /// transaction rolls every earlier insert back.
  async fn insert_events(&self, events: Vec<ConsentEvent>) -> Result<()> {
    let rows: Vec<(String, String, &'static str, String, bool)> = events
      .into_iter()
      .map(|e| {
        (e.event_id, e.user_id, e.kind.as_str(), encode_dt(e.created_at), e.enabled)
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO events (id, user_id, consent_id, created_at, enabled)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for (id, user_id, kind, created_at, enabled) in &rows {
            stmt.execute(rusqlite::params![id, user_id, kind, created_at, enabled])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// One sub-select per known kind, each picking the most recent event for
/// `(?1, kind)`, glued together with `UNION ALL`.
///
/// Parameters: `?1` is the user id, `?2..` are the kinds in
/// [`ConsentKind::ALL`] order. Ties on `created_at` go to the row inserted
/// last.
fn latest_consents_sql() -> String {
  (0..ConsentKind::ALL.len())
    .map(|i| {
      format!(
        "SELECT * FROM (
           SELECT consent_id, enabled
           FROM events
           WHERE user_id = ?1 AND consent_id = ?{}
           ORDER BY created_at DESC, rowid DESC
           LIMIT 1
         )",
        i + 2
      )
    })
    .collect::<Vec<_>>()
    .join(" UNION ALL ")
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn create_user(&self, email: &str) -> Result<User> {
    let user = User::new(generate_id(), email.to_owned());

    let id_str    = user.id.clone();
    let email_str = user.email.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, email) VALUES (?1, ?2)",
          rusqlite::params![id_str, email_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          Error::DuplicateEmail(email.to_owned())
        } else {
          Error::Database(e)
        }
      })?;

    tracing::debug!(user_id = %user.id, "created user");
    Ok(user)
  }

  async fn delete_user(&self, id: &str) -> Result<()> {
    let id_str = id.to_owned();

    let (events, users) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let events =
          tx.execute("DELETE FROM events WHERE user_id = ?1", rusqlite::params![id_str])?;
        let users = tx.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id_str])?;
        tx.commit()?;
        Ok((events, users))
      })
      .await?;

    tracing::debug!(user_id = %id, users, events, "deleted user");
    Ok(())
  }

  async fn user_detail(&self, id: &str) -> Result<Option<User>> {
    let id_str = id.to_owned();

    let found: Option<(String, String, Vec<RawConsent>)> = self
      .conn
      .call(move |conn| {
        // Identity and consents are read under one snapshot.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;

        let identity = tx
          .query_row(
            "SELECT id, email FROM users WHERE id = ?1",
            rusqlite::params![id_str],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
          )
          .optional();

        let (user_id, email) = match identity {
          Ok(Some(row)) => row,
          Ok(None) => return Ok(None),
          Err(e) => {
            tracing::warn!(user_id = %id_str, error = %e, "user lookup failed, treating as absent");
            return Ok(None);
          }
        };

        let consents = {
          let mut params: Vec<&str> = Vec::with_capacity(ConsentKind::ALL.len() + 1);
          params.push(&user_id);
          params.extend(ConsentKind::ALL.iter().map(|k| k.as_str()));

          let mut stmt = tx.prepare(&latest_consents_sql())?;
          let rows = stmt
            .query_map(rusqlite::params_from_iter(params), |row| {
              Ok(RawConsent {
                consent_id: row.get(0)?,
                enabled:    row.get(1)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };

        tx.commit()?;
        Ok(Some((user_id, email, consents)))
      })
      .await?;

    let Some((id, email, raws)) = found else {
      return Ok(None);
    };

    let mut consents = raws
      .into_iter()
      .map(RawConsent::into_consent)
      .collect::<Result<Vec<_>>>()?;
    consents.sort_by_key(|c| c.id.position());

    Ok(Some(User { id, email, consents }))
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn record_consents(&self, user_id: &str, consents: Vec<NewConsent>) -> Result<()> {
    if consents.is_empty() {
      return Err(consents_core::Error::EmptyBatch.into());
    }

    let events: Vec<ConsentEvent> = consents
      .into_iter()
      .map(|c| ConsentEvent {
        event_id:   generate_id(),
        user_id:    user_id.to_owned(),
        kind:       c.kind,
        enabled:    c.enabled,
        created_at: Utc::now(),
      })
      .collect();
    let count = events.len();

    self.insert_events(events).await?;

    tracing::debug!(user_id = %user_id, count, "recorded consent batch");
    Ok(())
  }
}
