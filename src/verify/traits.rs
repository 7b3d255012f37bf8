use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Response;

use crate::domain::Form;
use crate::request::RequestSpec;

/// Outcome of judging one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub code: u16,
    pub success: bool,
}

impl Verdict {
    #[must_use]
    pub const fn new(code: u16, success: bool) -> Self {
        Self { code, success }
    }

    #[must_use]
    pub const fn failure(code: u16) -> Self {
        Self {
            code,
            success: false,
        }
    }
}

/// Judges an HTTP attempt from its response. Takes the response by value so
/// implementations may consume the body.
#[async_trait]
pub trait HttpVerifier: Send + Sync {
    async fn verify(&self, spec: &RequestSpec, response: Response) -> Verdict;
}

/// Judges a WebSocket ping cycle from the outgoing sequence id and the reply
/// payload.
pub trait WebSocketVerifier: Send + Sync {
    fn verify(&self, spec: &RequestSpec, seq: &str, message: &[u8]) -> Verdict;
}

impl<F> WebSocketVerifier for F
where
    F: Fn(&RequestSpec, &str, &[u8]) -> Verdict + Send + Sync,
{
    fn verify(&self, spec: &RequestSpec, seq: &str, message: &[u8]) -> Verdict {
        self(spec, seq, message)
    }
}

/// A verifier capability already looked up for a specific form.
#[derive(Clone)]
pub enum ResolvedVerifier {
    Http(Arc<dyn HttpVerifier>),
    WebSocket(Arc<dyn WebSocketVerifier>),
}

impl ResolvedVerifier {
    #[must_use]
    pub const fn form(&self) -> Form {
        match self {
            ResolvedVerifier::Http(_) => Form::Http,
            ResolvedVerifier::WebSocket(_) => Form::WebSocket,
        }
    }
}

impl std::fmt::Debug for ResolvedVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ResolvedVerifier")
            .field(&self.form().as_str())
            .finish()
    }
}
