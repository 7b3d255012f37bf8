use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::Form;
use crate::error::VerifyError;

use super::builtins::{JsonHttpVerifier, JsonWebSocketVerifier, StatusCodeVerifier};
use super::{HttpVerifier, ResolvedVerifier, WebSocketVerifier};

/// Capability table keyed by `"<form>.<name>"`.
///
/// Registration overwrites: the last verifier registered under a key wins.
/// There is no removal. Writes normally happen during setup, before any
/// request spec is built; lookups take the read side of the lock.
#[derive(Default)]
pub struct VerifierRegistry {
    http: RwLock<HashMap<String, Arc<dyn HttpVerifier>>>,
    websocket: RwLock<HashMap<String, Arc<dyn WebSocketVerifier>>>,
}

impl VerifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `http.statusCode`, `http.json` and
    /// `webSocket.json`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_http("statusCode", StatusCodeVerifier);
        registry.register_http("json", JsonHttpVerifier);
        registry.register_websocket("json", JsonWebSocketVerifier);
        registry
    }

    pub fn register_http<V>(&self, name: &str, verifier: V)
    where
        V: HttpVerifier + 'static,
    {
        let key = Form::Http.verifier_key(name);
        let mut map = self.http.write().unwrap_or_else(PoisonError::into_inner);
        if map.insert(key.clone(), Arc::new(verifier)).is_some() {
            tracing::debug!("Replaced verifier {}", key);
        }
    }

    pub fn register_websocket<V>(&self, name: &str, verifier: V)
    where
        V: WebSocketVerifier + 'static,
    {
        let key = Form::WebSocket.verifier_key(name);
        let mut map = self
            .websocket
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if map.insert(key.clone(), Arc::new(verifier)).is_some() {
            tracing::debug!("Replaced verifier {}", key);
        }
    }

    /// Looks up an HTTP verifier by name.
    ///
    /// # Errors
    ///
    /// Returns `VerifierNotFound` when nothing is registered under
    /// `http.<name>`.
    pub fn lookup_http(&self, name: &str) -> Result<Arc<dyn HttpVerifier>, VerifyError> {
        let key = Form::Http.verifier_key(name);
        let map = self.http.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&key)
            .cloned()
            .ok_or(VerifyError::VerifierNotFound { key })
    }

    /// Looks up a WebSocket verifier by name.
    ///
    /// # Errors
    ///
    /// Returns `VerifierNotFound` when nothing is registered under
    /// `webSocket.<name>`.
    pub fn lookup_websocket(&self, name: &str) -> Result<Arc<dyn WebSocketVerifier>, VerifyError> {
        let key = Form::WebSocket.verifier_key(name);
        let map = self
            .websocket
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        map.get(&key)
            .cloned()
            .ok_or(VerifyError::VerifierNotFound { key })
    }

    /// Looks up the verifier for `form` and wraps it as a resolved capability.
    ///
    /// # Errors
    ///
    /// Returns `VerifierNotFound` carrying the composite key.
    pub fn lookup(&self, form: Form, name: &str) -> Result<ResolvedVerifier, VerifyError> {
        match form {
            Form::Http => self.lookup_http(name).map(ResolvedVerifier::Http),
            Form::WebSocket => self.lookup_websocket(name).map(ResolvedVerifier::WebSocket),
        }
    }

    /// Registered names for `form`, sorted.
    #[must_use]
    pub fn names(&self, form: Form) -> Vec<String> {
        let prefix = Form::verifier_key(form, "");
        let mut names: Vec<String> = match form {
            Form::Http => self
                .http
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .keys()
                .filter_map(|key| key.strip_prefix(&prefix).map(str::to_owned))
                .collect(),
            Form::WebSocket => self
                .websocket
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .keys()
                .filter_map(|key| key.strip_prefix(&prefix).map(str::to_owned))
                .collect(),
        };
        names.sort_unstable();
        names
    }
}
