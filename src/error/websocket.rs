use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum WebSocketError {
    #[error("Invalid WebSocket request for '{url}': {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("Invalid handshake header name '{header}': {source}")]
    InvalidHeaderName {
        header: String,
        #[source]
        source: tungstenite::http::header::InvalidHeaderName,
    },
    #[error("Invalid value for handshake header '{header}': {source}")]
    InvalidHeaderValue {
        header: String,
        #[source]
        source: tungstenite::http::header::InvalidHeaderValue,
    },
    #[error("Failed to connect to '{url}': {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("Timed out connecting to '{url}'.")]
    ConnectTimedOut { url: String },
    #[error("Failed to send message: {source}")]
    SendFailed {
        #[source]
        source: tungstenite::Error,
    },
    #[error("Failed to read message: {source}")]
    ReadFailed {
        #[source]
        source: tungstenite::Error,
    },
    #[error("Connection closed by peer.")]
    ClosedByPeer,
    #[error("Timed out waiting for a reply.")]
    ReadTimedOut,
}
