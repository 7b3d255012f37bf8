use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{HTTP_OK, PARSE_ERROR};
use crate::request::RequestSpec;

use super::{HttpVerifier, Verdict, WebSocketVerifier};

/// `http.statusCode`: the response status is the code; 200 is success.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodeVerifier;

#[async_trait]
impl HttpVerifier for StatusCodeVerifier {
    async fn verify(&self, spec: &RequestSpec, response: Response) -> Verdict {
        let status = response.status().as_u16();
        if spec.debug {
            info!("verify url={} status={}", spec.url, status);
        }
        Verdict::new(status, status == HTTP_OK)
    }
}

#[derive(Debug, Deserialize)]
struct HttpJsonBody {
    #[serde(default)]
    code: serde_json::Value,
    #[serde(default)]
    msg: Option<String>,
}

/// `http.json`: a 200 response whose JSON body carries `"code": 200` (string or
/// number). Non-200 statuses keep their status as the code.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHttpVerifier;

#[async_trait]
impl HttpVerifier for JsonHttpVerifier {
    async fn verify(&self, spec: &RequestSpec, response: Response) -> Verdict {
        let status = response.status();
        if status != StatusCode::OK {
            return Verdict::failure(status.as_u16());
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                warn!("Failed to read response body: {}", err);
                return Verdict::failure(PARSE_ERROR);
            }
        };
        if spec.debug {
            info!("verify url={} body={}", spec.url, String::from_utf8_lossy(&body));
        }

        let parsed: HttpJsonBody = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Response body is not valid JSON: {}", err);
                return Verdict::failure(PARSE_ERROR);
            }
        };
        match json_code(&parsed.code) {
            Some(code) => Verdict::new(code, code == HTTP_OK),
            None => {
                warn!(
                    "Response JSON has no numeric code (msg: {})",
                    parsed.msg.as_deref().unwrap_or_default()
                );
                Verdict::failure(PARSE_ERROR)
            }
        }
    }
}

fn json_code(value: &serde_json::Value) -> Option<u16> {
    match value {
        serde_json::Value::String(text) => text.trim().parse::<u16>().ok(),
        serde_json::Value::Number(number) => {
            number.as_u64().and_then(|code| u16::try_from(code).ok())
        }
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Array(_)
        | serde_json::Value::Object(_) => None,
    }
}

#[derive(Debug, Default, Deserialize)]
struct WebSocketReply {
    #[serde(default)]
    seq: String,
    #[serde(default)]
    cmd: String,
    #[serde(default)]
    response: WebSocketReplyBody,
}

#[derive(Debug, Default, Deserialize)]
struct WebSocketReplyBody {
    #[serde(default)]
    code: i64,
    #[serde(default, rename = "codeMsg")]
    code_msg: String,
}

/// `webSocket.json`: the reply must echo the outgoing `seq` and carry
/// `response.code == 200`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWebSocketVerifier;

impl WebSocketVerifier for JsonWebSocketVerifier {
    fn verify(&self, spec: &RequestSpec, seq: &str, message: &[u8]) -> Verdict {
        if spec.debug {
            info!(
                "verify seq={} body={}",
                seq,
                String::from_utf8_lossy(message)
            );
        }

        let reply: WebSocketReply = match serde_json::from_slice(message) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    "Reply is not valid JSON: {} (body: {})",
                    err,
                    String::from_utf8_lossy(message)
                );
                return Verdict::failure(PARSE_ERROR);
            }
        };

        if reply.seq != seq {
            warn!("Reply seq mismatch: sent {} got {}", seq, reply.seq);
            return Verdict::failure(PARSE_ERROR);
        }

        let code = u16::try_from(reply.response.code).unwrap_or(PARSE_ERROR);
        if code != HTTP_OK {
            tracing::debug!(
                "Reply {} cmd={} code={} msg={}",
                reply.seq,
                reply.cmd,
                code,
                reply.response.code_msg
            );
        }
        Verdict::new(code, code == HTTP_OK)
    }
}
