use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use crate::coordinator::CompletionGuard;
use crate::domain::{REQUEST_ERROR, RequestResult};
use crate::request::RequestSpec;
use crate::shutdown::{ShutdownReceiver, shutdown_requested, wait_for_shutdown};
use crate::verify::{HttpVerifier, Verdict};

use super::HttpExecutor;

/// One simulated HTTP client: runs `quota` sequential attempts and reports
/// each of them.
pub(crate) struct HttpWorker {
    pub(crate) id: u64,
    pub(crate) quota: u64,
    pub(crate) spec: Arc<RequestSpec>,
    pub(crate) executor: Arc<HttpExecutor>,
    pub(crate) verifier: Arc<dyn HttpVerifier>,
    pub(crate) results: mpsc::Sender<RequestResult>,
    pub(crate) completion: CompletionGuard,
}

impl HttpWorker {
    pub(crate) async fn run(self, mut shutdown_rx: ShutdownReceiver) {
        let Self {
            id,
            quota,
            spec,
            executor,
            verifier,
            results,
            completion,
        } = self;
        debug!("HTTP worker {} started (quota {})", id, quota);

        let mut sequence: u64 = 0;
        while sequence < quota {
            if shutdown_requested(&mut shutdown_rx) {
                debug!("HTTP worker {} cancelled before attempt {}", id, sequence);
                break;
            }

            let started = Instant::now();
            let attempt = async {
                let execution = executor.execute(&spec).await;
                let verdict = match execution.response {
                    Ok(response) => verifier.verify(&spec, response).await,
                    Err(err) => {
                        debug!("Request {}_{} failed: {}", id, sequence, err);
                        Verdict::failure(REQUEST_ERROR)
                    }
                };
                (verdict, execution.latency)
            };

            let (verdict, latency, cancelled) = tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    (Verdict::failure(REQUEST_ERROR), started.elapsed(), true)
                }
                (verdict, latency) = attempt => (verdict, latency, false),
            };

            let result = RequestResult::new(id, sequence, latency, verdict.success, verdict.code);
            if results.send(result).await.is_err() {
                debug!("HTTP worker {} stopping: result stream closed", id);
                break;
            }
            sequence = sequence.saturating_add(1);
            if cancelled {
                debug!("HTTP worker {} cancelled during an attempt", id);
                break;
            }
        }

        drop(results);
        completion.finish();
        debug!("HTTP worker {} finished after {} attempts", id, sequence);
    }
}
