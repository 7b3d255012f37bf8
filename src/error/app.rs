use thiserror::Error;

use super::{ConfigError, HttpError, ValidationError, VerifyError, WebSocketError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Verifier error: {0}")]
    Verify(#[from] VerifyError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WebSocketError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn verify<E>(error: E) -> Self
    where
        E: Into<VerifyError>,
    {
        error.into().into()
    }

    pub fn http<E>(error: E) -> Self
    where
        E: Into<HttpError>,
    {
        error.into().into()
    }

    pub fn websocket<E>(error: E) -> Self
    where
        E: Into<WebSocketError>,
    {
        error.into().into()
    }
}
