use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::RequestResult;

/// Running totals over the result stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTally {
    pub total: u64,
    pub successes: u64,
    pub failures: u64,
    /// Result count per code, ordered by code.
    pub codes: BTreeMap<u16, u64>,
    pub latency_sum_nanos: u128,
    pub min_latency_nanos: Option<u64>,
    pub max_latency_nanos: u64,
    pub duration: Duration,
}

impl RunTally {
    pub fn record(&mut self, result: &RequestResult) {
        self.total = self.total.saturating_add(1);
        if result.success {
            self.successes = self.successes.saturating_add(1);
        } else {
            self.failures = self.failures.saturating_add(1);
        }
        let count = self.codes.entry(result.code).or_insert(0);
        *count = count.saturating_add(1);

        self.latency_sum_nanos = self
            .latency_sum_nanos
            .saturating_add(u128::from(result.latency_nanos));
        self.min_latency_nanos = Some(
            self.min_latency_nanos
                .map_or(result.latency_nanos, |min| min.min(result.latency_nanos)),
        );
        self.max_latency_nanos = self.max_latency_nanos.max(result.latency_nanos);
    }

    #[must_use]
    pub fn avg_latency_nanos(&self) -> u64 {
        self.latency_sum_nanos
            .checked_div(u128::from(self.total))
            .and_then(|avg| u64::try_from(avg).ok())
            .unwrap_or(0)
    }
}

/// Reads the stream to its end. The stream ends once every worker has
/// finished producing, which for keep-alive WebSocket runs is before the
/// connections close.
pub async fn drain_results(mut results: mpsc::Receiver<RequestResult>) -> RunTally {
    let started = Instant::now();
    let mut tally = RunTally::default();
    while let Some(result) = results.recv().await {
        debug!(
            "result id={} success={} code={} latency={}ns",
            result.id, result.success, result.code, result.latency_nanos
        );
        tally.record(&result);
    }
    tally.duration = started.elapsed();
    tally
}

pub struct SummaryStats {
    pub success_rate_x100: u64,
    pub avg_rps_x100: u64,
}

#[must_use]
pub fn compute_summary_stats(tally: &RunTally) -> SummaryStats {
    let duration_ms = tally.duration.as_millis().max(1);

    let success_rate_x100 = if tally.total > 0 {
        let scaled = u128::from(tally.successes)
            .saturating_mul(10_000)
            .checked_div(u128::from(tally.total))
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    } else {
        0
    };

    let avg_rps_x100 = if tally.total > 0 {
        let scaled = u128::from(tally.total)
            .saturating_mul(100_000)
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    } else {
        0
    };

    SummaryStats {
        success_rate_x100,
        avg_rps_x100,
    }
}

const fn nanos_to_ms(nanos: u64) -> u64 {
    nanos / 1_000_000
}

pub fn print_summary(tally: &RunTally) {
    let stats = compute_summary_stats(tally);

    println!("Duration: {}ms", tally.duration.as_millis());
    println!("Total Requests: {}", tally.total);
    println!(
        "Successful: {} ({}.{:02}%)",
        tally.successes,
        stats.success_rate_x100 / 100,
        stats.success_rate_x100 % 100
    );
    println!("Failed: {}", tally.failures);
    for (code, count) in &tally.codes {
        println!("Code {}: {}", code, count);
    }
    println!("Avg Latency: {}ms", nanos_to_ms(tally.avg_latency_nanos()));
    println!(
        "Min/Max Latency: {}ms / {}ms",
        nanos_to_ms(tally.min_latency_nanos.unwrap_or(0)),
        nanos_to_ms(tally.max_latency_nanos)
    );
    println!(
        "Avg RPS: {}.{:02}",
        stats.avg_rps_x100 / 100,
        stats.avg_rps_x100 % 100
    );
}
