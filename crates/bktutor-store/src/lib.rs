//! # bktutor-store
//!
//! Local persistence for the bktutor client, backed by SQLite.
//!
//! The only state kept outside the backend is the "recent downloads" log.
//! The crate exposes a synchronous `Database` handle wrapping a
//! `rusqlite::Connection` with typed helpers for it.

pub mod database;
pub mod downloads;
pub mod migrations;
pub mod models;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
