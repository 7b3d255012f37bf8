use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, TesterArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

/// Applies configuration values to CLI arguments. Arguments given on the
/// command line are left untouched.
///
/// # Errors
///
/// Returns an error when a config value is out of range or malformed.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = ensure_positive_u64(concurrency, "concurrency")?;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = ensure_positive_u64(requests, "requests")?;
    }

    if !is_cli(matches, "verify")
        && let Some(verify) = config.verify.clone()
    {
        args.verify = verify;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.clone()
    {
        args.headers = headers;
    }

    if !is_cli(matches, "data")
        && let Some(data) = config.data.clone()
    {
        args.data = data;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration("timeout")?;
    }

    if !is_cli(matches, "compressed")
        && let Some(compressed) = config.compressed
    {
        args.compressed = compressed;
    }

    if !is_cli(matches, "no_keepalive")
        && let Some(keepalive) = config.keepalive
    {
        args.no_keepalive = !keepalive;
    }

    if !is_cli(matches, "first_delay")
        && let Some(first_delay) = config.first_delay.as_ref()
    {
        args.first_delay = first_delay.to_delay("first_delay")?;
    }

    if !is_cli(matches, "ping_interval")
        && let Some(ping_interval) = config.ping_interval.as_ref()
    {
        args.ping_interval = ping_interval.to_duration("ping_interval")?;
    }

    if !is_cli(matches, "debug")
        && let Some(debug) = config.debug
    {
        args.debug = debug;
    }

    Ok(())
}
