//! SQL schema for the consents SQLite store.
//!
//! Executed at every connection startup; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id     TEXT PRIMARY KEY,
    email  TEXT NOT NULL UNIQUE
);

-- Consent events are append-only.
-- Rows are only ever deleted together with their user.
CREATE TABLE IF NOT EXISTS events (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(id),
    consent_id  TEXT NOT NULL,      -- 'email' | 'sms'
    created_at  TEXT NOT NULL,      -- RFC 3339 UTC, fixed nanosecond width
    enabled     INTEGER NOT NULL    -- 0 | 1
);

CREATE INDEX IF NOT EXISTS events_latest_idx
    ON events(user_id, consent_id, created_at);

PRAGMA user_version = 1;
";
