use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::RequestResult;
use crate::error::AppResult;
use crate::http::{HttpExecutor, HttpWorker};
use crate::request::RequestSpec;
use crate::shutdown::ShutdownSender;
use crate::verify::ResolvedVerifier;
use crate::websocket::{PingSchedule, WebSocketWorker};

use super::CompletionTracker;

/// Capacity of the result stream. Producers wait when it is full.
pub const DEFAULT_RESULT_BUFFER: usize = 1000;

/// Shape of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub concurrency: u64,
    pub requests_per_worker: u64,
    pub keep_alive: bool,
    pub compressed: bool,
    pub ping: PingSchedule,
    pub result_buffer: usize,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            concurrency: 1,
            requests_per_worker: 1,
            keep_alive: true,
            compressed: false,
            ping: PingSchedule::default(),
            result_buffer: DEFAULT_RESULT_BUFFER,
        }
    }
}

/// A started run: the result stream plus the task that owns its lifecycle.
#[derive(Debug)]
pub struct RunHandle {
    pub results: mpsc::Receiver<RequestResult>,
    pub supervisor: JoinHandle<()>,
}

impl RunHandle {
    /// Waits for every worker to exit.
    ///
    /// # Errors
    ///
    /// Returns an error when the supervisor task panicked or was aborted.
    pub async fn wait(self) -> AppResult<()> {
        drop(self.results);
        self.supervisor.await?;
        Ok(())
    }
}

/// Spawns `plan.concurrency` workers of the spec's form and a supervisor
/// that ends the result stream once all of them have finished producing.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built.
pub fn start_run(
    spec: &Arc<RequestSpec>,
    plan: &RunPlan,
    shutdown_tx: &ShutdownSender,
) -> AppResult<RunHandle> {
    let (results_tx, results_rx) = mpsc::channel(plan.result_buffer.max(1));
    let tracker = CompletionTracker::new();
    let mut workers = Vec::new();

    match spec.verifier().clone() {
        ResolvedVerifier::Http(verifier) => {
            let executor = Arc::new(HttpExecutor::new(spec, plan.compressed)?);
            for id in 0..plan.concurrency {
                let worker = HttpWorker {
                    id,
                    quota: plan.requests_per_worker,
                    spec: Arc::clone(spec),
                    executor: Arc::clone(&executor),
                    verifier: Arc::clone(&verifier),
                    results: results_tx.clone(),
                    completion: tracker.register(),
                };
                let shutdown_rx = shutdown_tx.subscribe();
                workers.push(tokio::spawn(worker.run(shutdown_rx)));
            }
        }
        ResolvedVerifier::WebSocket(verifier) => {
            for id in 0..plan.concurrency {
                let worker = WebSocketWorker {
                    id,
                    quota: plan.requests_per_worker,
                    keep_alive: plan.keep_alive,
                    ping: plan.ping,
                    spec: Arc::clone(spec),
                    verifier: Arc::clone(&verifier),
                    results: results_tx.clone(),
                    completion: tracker.register(),
                };
                let shutdown_rx = shutdown_tx.subscribe();
                workers.push(tokio::spawn(worker.run(shutdown_rx)));
            }
        }
    }
    info!(
        "Started {} {} workers ({} attempts each)",
        plan.concurrency, spec.form, plan.requests_per_worker
    );

    // Held until the workers have been joined so parked workers keep a live
    // cancellation channel.
    let shutdown_tx = shutdown_tx.clone();
    let supervisor = tokio::spawn(async move {
        tracker.wait_all().await;
        debug!("All workers finished producing results");
        drop(results_tx);

        for handle in workers {
            if let Err(err) = handle.await {
                warn!("Worker task failed: {}", err);
            }
        }
        drop(shutdown_tx);
        debug!("All workers exited");
    });

    Ok(RunHandle {
        results: results_rx,
        supervisor,
    })
}
