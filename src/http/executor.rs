use std::time::Duration;

use reqwest::{
    Client,
    header::{ACCEPT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use tokio::time::Instant;
use tracing::error;

use crate::error::{AppError, AppResult, HttpError};
use crate::request::{DEFAULT_CONTENT_TYPE, RequestSpec};

/// Timing and outcome of one HTTP attempt.
#[derive(Debug)]
pub struct HttpExecution {
    pub response: Result<reqwest::Response, reqwest::Error>,
    /// Time from just before the request is issued until response headers
    /// arrive. The body is not drained, so large bodies undercount.
    pub latency: Duration,
}

/// Issues attempts for one spec over a shared client.
///
/// Certificate and hostname validation are disabled so self-signed and
/// staging endpoints can be loaded. `spec.timeout` is the hard deadline for
/// every attempt.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    headers: HeaderMap,
    compressed: bool,
}

impl HttpExecutor {
    /// Builds the client and validates the spec headers once.
    ///
    /// # Errors
    ///
    /// Returns an error when a header name/value is invalid or the client
    /// cannot be built.
    pub fn new(spec: &RequestSpec, compressed: bool) -> AppResult<Self> {
        let headers = build_headers(spec)?;

        let mut client_builder = Client::builder()
            .timeout(spec.timeout)
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
        if !compressed {
            client_builder = client_builder.no_gzip();
        }

        let client = match client_builder.build() {
            Ok(client) => client,
            Err(err) => {
                error!("Failed to build HTTP client: {}", err);
                return Err(AppError::http(HttpError::BuildClientFailed { source: err }));
            }
        };

        Ok(Self {
            client,
            headers,
            compressed,
        })
    }

    /// Runs one attempt. Transport failures come back in `response`; the
    /// caller decides what code they map to.
    pub async fn execute(&self, spec: &RequestSpec) -> HttpExecution {
        let mut request_builder = self
            .client
            .request(spec.method.clone(), &spec.url)
            .headers(self.headers.clone());
        if self.compressed {
            request_builder = request_builder.header(ACCEPT_ENCODING, "gzip");
        }
        if !spec.body.is_empty() {
            request_builder = request_builder.body(spec.body.clone());
        }

        let request = match request_builder.build() {
            Ok(request) => request,
            Err(err) => {
                return HttpExecution {
                    response: Err(err),
                    latency: Duration::ZERO,
                };
            }
        };

        let start = Instant::now();
        let response = self.client.execute(request).await;
        HttpExecution {
            response,
            latency: start.elapsed(),
        }
    }
}

fn build_headers(spec: &RequestSpec) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(spec.headers.len().saturating_add(1));
    for (key, value) in &spec.headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderName {
                header: key.clone(),
                source: err,
            })
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderValue {
                header: key.clone(),
                source: err,
            })
        })?;
        headers.insert(name, header_value);
    }
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }
    Ok(headers)
}
