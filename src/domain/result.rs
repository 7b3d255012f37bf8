use std::time::Duration;

/// Formats the per-attempt identifier `"<workerId>_<sequence>"`.
#[must_use]
pub fn sequence_id(worker_id: u64, sequence: u64) -> String {
    format!("{}_{}", worker_id, sequence)
}

/// One completed attempt. Built once, moved into the result stream, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    pub id: String,
    pub worker_id: u64,
    pub sequence: u64,
    pub latency_nanos: u64,
    pub success: bool,
    pub code: u16,
}

impl RequestResult {
    #[must_use]
    pub fn new(worker_id: u64, sequence: u64, latency: Duration, success: bool, code: u16) -> Self {
        Self {
            id: sequence_id(worker_id, sequence),
            worker_id,
            sequence,
            latency_nanos: u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX),
            success,
            code,
        }
    }

    /// Record for an attempt that never reached the target.
    #[must_use]
    pub fn failed(worker_id: u64, sequence: u64, code: u16) -> Self {
        Self::new(worker_id, sequence, Duration::ZERO, false, code)
    }
}
