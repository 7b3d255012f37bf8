//! Core library for the `stressor` CLI.
//!
//! Builds one immutable request description from CLI and config input,
//! fans it out over concurrent HTTP or WebSocket workers, judges every
//! attempt with a registered verifier and streams the per-attempt results
//! to a consumer.
pub mod args;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod report;
pub mod request;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod verify;
pub mod websocket;

#[cfg(test)]
mod test_support;
