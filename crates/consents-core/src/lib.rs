//! Core types and trait definitions for the consents service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store and API crates depend on it; it depends on nothing of theirs.

pub mod consent;
pub mod error;
pub mod id;
pub mod store;
pub mod user;

pub use error::{Error, Result};
