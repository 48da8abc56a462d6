//! Page controllers.
//!
//! Each controller owns an [`ApiClient`](crate::api::ApiClient) clone plus
//! the state of one page, and every operation returns a
//! [`Step`](crate::events::Step) telling the caller whether to stay or leave.

pub mod attended;
pub mod auth;
pub mod booking;
pub mod browse;
pub mod downloads;
pub mod home;
pub mod messaging;
pub mod profile;
