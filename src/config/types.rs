use std::time::Duration;

use serde::Deserialize;

use crate::args::{parse_delay_text, parse_duration_text};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

/// Contents of `stressor.toml` / `stressor.json`. Every field is optional;
/// values given on the command line win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub concurrency: Option<u64>,
    pub requests: Option<u64>,
    pub verify: Option<String>,
    pub headers: Option<Vec<String>>,
    pub data: Option<String>,
    pub timeout: Option<DurationValue>,
    pub compressed: Option<bool>,
    pub keepalive: Option<bool>,
    pub first_delay: Option<DurationValue>,
    pub ping_interval: Option<DurationValue>,
    pub debug: Option<bool>,
}

/// Integer seconds or a string with a unit suffix (`"250ms"`, `"2m"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    /// Strictly positive duration for `field`.
    pub(crate) fn to_duration(&self, field: &str) -> AppResult<Duration> {
        let parsed = match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_text(text),
        };
        parsed.map_err(|err| invalid_duration(field, err))
    }

    /// Like [`to_duration`](Self::to_duration) but zero is allowed.
    pub(crate) fn to_delay(&self, field: &str) -> AppResult<Duration> {
        let parsed = match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_delay_text(text),
        };
        parsed.map_err(|err| invalid_duration(field, err))
    }
}

fn invalid_duration(field: &str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidDuration {
        field: field.to_owned(),
        source,
    })
}
