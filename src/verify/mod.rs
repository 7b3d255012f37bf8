//! Pluggable success criteria for attempts.
//!
//! Verifiers are registered under a composite `"<form>.<name>"` key in a
//! [`VerifierRegistry`] that is built at startup and passed explicitly to
//! request construction. A [`RequestSpec`](crate::request::RequestSpec)
//! resolves its verifier once and keeps the capability itself, so the attempt
//! loops never consult the registry.
mod builtins;
mod registry;
mod traits;


pub use builtins::{JsonHttpVerifier, JsonWebSocketVerifier, StatusCodeVerifier};
pub use registry::VerifierRegistry;
pub use traits::{HttpVerifier, ResolvedVerifier, Verdict, WebSocketVerifier};

/// Verifier name callers pass when they did not pick one.
pub const DEFAULT_VERIFIER: &str = "statusCode";
/// Verifier substituted for [`DEFAULT_VERIFIER`] on WebSocket targets.
pub const DEFAULT_WEBSOCKET_VERIFIER: &str = "json";
