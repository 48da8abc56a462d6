//! # bktutor-client
//!
//! Headless client for the tutoring platform's REST gateway. It models the
//! student web pages as controllers that own their state, talk to the
//! backend through one cookie-carrying [`api::ApiClient`], and report where
//! to go next as an [`events::Step`].

pub mod api;
pub mod cart;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod events;
pub mod filter;
pub mod merge;
pub mod pagination;
pub mod sequence;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bktutor_client=debug,bktutor_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
