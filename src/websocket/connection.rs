use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::WebSocketError;
use crate::request::RequestSpec;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Ping frame sent for sequence id `seq`.
#[must_use]
pub fn ping_payload(seq: &str) -> String {
    format!(r#"{{"seq":"{}","cmd":"ping","data":{{}}}}"#, seq)
}

/// An open WebSocket connection. [`close`](Self::close) consumes it, so a
/// connection is released at most once; dropping it without closing still
/// tears down the socket.
pub struct WsConnection {
    stream: WsStream,
}

impl WsConnection {
    /// Opens a connection to `spec.url`, sending the spec headers with the
    /// handshake and bounding it by `spec.timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be formed, the handshake
    /// fails, or it does not finish in time.
    pub async fn connect(spec: &RequestSpec) -> Result<Self, WebSocketError> {
        let mut request = spec.url.as_str().into_client_request().map_err(|err| {
            WebSocketError::InvalidRequest {
                url: spec.url.clone(),
                source: err,
            }
        })?;
        for (key, value) in &spec.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
                WebSocketError::InvalidHeaderName {
                    header: key.clone(),
                    source: err,
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|err| WebSocketError::InvalidHeaderValue {
                    header: key.clone(),
                    source: err,
                })?;
            request.headers_mut().insert(name, header_value);
        }

        match timeout(spec.timeout, connect_async(request)).await {
            Ok(Ok((stream, _response))) => Ok(Self { stream }),
            Ok(Err(err)) => Err(WebSocketError::ConnectFailed {
                url: spec.url.clone(),
                source: err,
            }),
            Err(_) => Err(WebSocketError::ConnectTimedOut {
                url: spec.url.clone(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns `SendFailed` when the frame cannot be written.
    pub async fn send_text(&mut self, payload: String) -> Result<(), WebSocketError> {
        self.stream
            .send(Message::Text(payload))
            .await
            .map_err(|err| WebSocketError::SendFailed { source: err })
    }

    /// Reads the next data frame, skipping control frames.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails, the peer closes, or nothing
    /// arrives within `deadline`.
    pub async fn read_message(&mut self, deadline: Duration) -> Result<Vec<u8>, WebSocketError> {
        let read = async {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(text.into_bytes()),
                    Some(Ok(Message::Binary(data))) => return Ok(data),
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                    Some(Ok(Message::Close(_))) | None => return Err(WebSocketError::ClosedByPeer),
                    Some(Err(err)) => return Err(WebSocketError::ReadFailed { source: err }),
                }
            }
        };
        timeout(deadline, read)
            .await
            .unwrap_or(Err(WebSocketError::ReadTimedOut))
    }

    /// Sends a close frame and drops the socket.
    pub async fn close(mut self) {
        drop(self.stream.close(None).await);
    }
}
