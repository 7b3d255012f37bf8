use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;

use crate::domain::Form;
use crate::error::{AppError, AppResult};
use crate::verify::{
    DEFAULT_VERIFIER, DEFAULT_WEBSOCKET_VERIFIER, HttpVerifier, ResolvedVerifier,
    VerifierRegistry, WebSocketVerifier,
};

use super::headers::parse_header_lines;

/// Deadline applied when the caller passes a zero timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Content-Type used for bodies sent without one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

const CONTENT_TYPE: &str = "Content-Type";

/// Raw request description as produced by the CLI/config layer.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub url: String,
    pub verify: String,
    pub timeout: Duration,
    pub debug: bool,
    pub headers: Vec<String>,
    pub body: String,
}

/// What to send and how to judge it. Immutable once built and shared
/// read-only by every worker of a run.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub url: String,
    pub form: Form,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub verify: String,
    pub timeout: Duration,
    pub debug: bool,
    verifier: ResolvedVerifier,
}

/// Derives the form from the URL scheme. Unknown or missing schemes fall back
/// to HTTP with an `http://` prefix.
#[must_use]
pub fn resolve_target(url: &str) -> (Form, String) {
    if url.starts_with("http://") || url.starts_with("https://") {
        (Form::Http, url.to_owned())
    } else if url.starts_with("ws://") || url.starts_with("wss://") {
        (Form::WebSocket, url.to_owned())
    } else {
        (Form::Http, format!("http://{}", url))
    }
}

impl RequestSpec {
    /// Resolves a raw request against `registry`.
    ///
    /// # Errors
    ///
    /// Returns `VerifierNotFound` when the verifier is not registered for the
    /// form derived from the URL.
    pub fn build(registry: &VerifierRegistry, raw: RawRequest) -> AppResult<Self> {
        let RawRequest {
            url,
            verify,
            timeout,
            debug,
            headers,
            body,
        } = raw;

        let mut header_map = parse_header_lines(&headers);
        let method = if body.is_empty() {
            Method::GET
        } else {
            if !header_map
                .iter()
                .any(|(key, _)| key.eq_ignore_ascii_case(CONTENT_TYPE))
            {
                header_map.push((CONTENT_TYPE.to_owned(), DEFAULT_CONTENT_TYPE.to_owned()));
            }
            Method::POST
        };

        let (form, url) = resolve_target(&url);
        let verify = match form {
            Form::WebSocket if verify == DEFAULT_VERIFIER => DEFAULT_WEBSOCKET_VERIFIER.to_owned(),
            Form::Http | Form::WebSocket => verify,
        };
        let verifier = registry.lookup(form, &verify).map_err(|err| {
            tracing::error!(
                "{} (registered for {}: {})",
                err,
                form,
                registry.names(form).join(", ")
            );
            AppError::verify(err)
        })?;

        let timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };

        Ok(Self {
            url,
            form,
            method,
            headers: header_map,
            body,
            verify,
            timeout,
            debug,
            verifier,
        })
    }

    #[must_use]
    pub const fn verifier(&self) -> &ResolvedVerifier {
        &self.verifier
    }

    #[must_use]
    pub fn http_verifier(&self) -> Option<Arc<dyn HttpVerifier>> {
        match &self.verifier {
            ResolvedVerifier::Http(verifier) => Some(Arc::clone(verifier)),
            ResolvedVerifier::WebSocket(_) => None,
        }
    }

    #[must_use]
    pub fn websocket_verifier(&self) -> Option<Arc<dyn WebSocketVerifier>> {
        match &self.verifier {
            ResolvedVerifier::WebSocket(verifier) => Some(Arc::clone(verifier)),
            ResolvedVerifier::Http(_) => None,
        }
    }

    /// First value stored under `key` (ASCII case-insensitive).
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Multi-line summary for startup logging.
    #[must_use]
    pub fn describe(&self) -> String {
        let headers = self
            .headers
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "request:\n form: {}\n url: {}\n method: {}\n headers: [{}]\n data: {}\n verify: {}\n timeout: {:?}\n debug: {}",
            self.form,
            self.url,
            self.method,
            headers,
            self.body,
            self.verify,
            self.timeout,
            self.debug
        )
    }
}
