//! Value types shared by the request engine: protocol form, sentinel codes,
//! and the per-attempt result record.
mod codes;
mod result;


pub use codes::{HTTP_OK, PARSE_ERROR, REQUEST_ERROR, REQUEST_TIMEOUT};
pub use result::{RequestResult, sequence_id};

/// Protocol discriminator for a request specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    Http,
    WebSocket,
}

impl Form {
    /// Tag used in verifier registration keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Form::Http => "http",
            Form::WebSocket => "webSocket",
        }
    }

    /// Composite registry key, `"<form>.<name>"`.
    #[must_use]
    pub fn verifier_key(self, name: &str) -> String {
        format!("{}.{}", self.as_str(), name)
    }
}

impl std::fmt::Display for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
