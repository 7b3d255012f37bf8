mod app;
mod config;
mod http;
mod validation;
mod verify;
mod websocket;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use validation::ValidationError;
pub use verify::VerifyError;
pub use websocket::WebSocketError;
