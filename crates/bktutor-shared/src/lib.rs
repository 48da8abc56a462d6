//! # bktutor-shared
//!
//! Domain types, wire DTOs and display helpers shared by the bktutor
//! client SDK and its local store.

pub mod constants;
pub mod error;
pub mod format;
pub mod protocol;
pub mod types;

pub use error::SharedError;
