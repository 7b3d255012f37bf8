//! Persistent-connection workers: a timed ping/verify/report cycle per
//! connection, with optional keep-alive once the attempt quota is spent.
mod connection;
mod worker;


use std::time::Duration;

pub use connection::{WsConnection, ping_payload};
pub(crate) use worker::WebSocketWorker;

/// Delay before the first ping after connecting.
pub const DEFAULT_FIRST_DELAY: Duration = Duration::from_secs(1);
/// Delay between consecutive pings.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(1);
/// Lower bound applied to the ping interval; a zero period is not a schedule.
const MIN_PING_INTERVAL: Duration = Duration::from_millis(1);

/// Ping cadence of a WebSocket worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingSchedule {
    pub first_delay: Duration,
    pub interval: Duration,
}

impl PingSchedule {
    #[must_use]
    pub fn new(first_delay: Duration, interval: Duration) -> Self {
        Self {
            first_delay,
            interval: interval.max(MIN_PING_INTERVAL),
        }
    }
}

impl Default for PingSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_FIRST_DELAY, DEFAULT_PING_INTERVAL)
    }
}
