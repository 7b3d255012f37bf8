//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::TesterArgs;
pub use types::PositiveU64;

pub(crate) use defaults::{DEFAULT_CONFIG_JSON, DEFAULT_CONFIG_TOML};
pub(crate) use parsers::{parse_delay_text, parse_duration_text};
