use clap::Parser;
use std::time::Duration;

use crate::coordinator::{DEFAULT_RESULT_BUFFER, RunPlan};
use crate::error::{AppError, AppResult, ValidationError};
use crate::request::RawRequest;
use crate::verify::DEFAULT_VERIFIER;
use crate::websocket::PingSchedule;

use super::parsers::{parse_bool_env, parse_delay_arg, parse_duration_arg, parse_positive_u64};
use super::types::PositiveU64;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP and WebSocket load generator with pluggable response verification.",
    next_help_heading = "Advanced Options"
)]
pub struct TesterArgs {
    /// Target URL; ws:// and wss:// select WebSocket, a bare host gets http://
    #[arg(long, short, help_heading = "Common Options")]
    pub url: Option<String>,

    /// Number of simulated clients
    #[arg(
        long,
        short = 'c',
        default_value = "1",
        value_parser = parse_positive_u64,
        help_heading = "Common Options"
    )]
    pub concurrency: PositiveU64,

    /// Attempts per client
    #[arg(
        long,
        short = 'n',
        default_value = "1",
        value_parser = parse_positive_u64,
        help_heading = "Common Options"
    )]
    pub requests: PositiveU64,

    /// Verifier name (statusCode, json, or a registered custom verifier)
    #[arg(long, short = 'v', default_value = DEFAULT_VERIFIER, help_heading = "Common Options")]
    pub verify: String,

    /// Request headers in 'Key: Value' format (repeatable; repeated keys are joined with "; ")
    #[arg(long = "header", short = 'H', help_heading = "Common Options")]
    pub headers: Vec<String>,

    /// Request body; a non-empty body switches the method to POST
    #[arg(long, short, default_value = "", help_heading = "Common Options")]
    pub data: String,

    /// Per-attempt deadline (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Ask for gzip-compressed responses
    #[arg(long)]
    pub compressed: bool,

    /// Close WebSocket connections once their quota is spent
    #[arg(long = "no-keepalive")]
    pub no_keepalive: bool,

    /// Delay before the first WebSocket ping (supports ms/s/m/h)
    #[arg(long = "first-delay", default_value = "1s", value_parser = parse_delay_arg)]
    pub first_delay: Duration,

    /// Delay between WebSocket pings (supports ms/s/m/h)
    #[arg(long = "ping-interval", default_value = "1s", value_parser = parse_duration_arg)]
    pub ping_interval: Duration,

    /// Log every verified response
    #[arg(long)]
    pub debug: bool,

    /// Path to a TOML or JSON config file (defaults to ./stressor.toml or ./stressor.json)
    #[arg(long, env = "STRESSOR_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

impl TesterArgs {
    /// Collects the request fields for [`RequestSpec::build`](crate::request::RequestSpec::build).
    ///
    /// # Errors
    ///
    /// Returns an error when no URL was given on the command line or in a
    /// config file.
    pub fn raw_request(&self) -> AppResult<RawRequest> {
        let url = self
            .url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
        Ok(RawRequest {
            url,
            verify: self.verify.clone(),
            timeout: self.request_timeout,
            debug: self.debug,
            headers: self.headers.clone(),
            body: self.data.clone(),
        })
    }

    #[must_use]
    pub fn run_plan(&self) -> RunPlan {
        RunPlan {
            concurrency: self.concurrency.get(),
            requests_per_worker: self.requests.get(),
            keep_alive: !self.no_keepalive,
            compressed: self.compressed,
            ping: PingSchedule::new(self.first_delay, self.ping_interval),
            result_buffer: DEFAULT_RESULT_BUFFER,
        }
    }
}
