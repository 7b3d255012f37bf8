use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use crate::coordinator::CompletionGuard;
use crate::domain::{PARSE_ERROR, REQUEST_ERROR, RequestResult, sequence_id};
use crate::error::WebSocketError;
use crate::request::RequestSpec;
use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};
use crate::verify::{Verdict, WebSocketVerifier};

use super::{PingSchedule, WsConnection, ping_payload};

/// The worker's current connection, if any.
///
/// A connection still held when the slot is dropped (the task panicked or
/// was aborted) is closed on a detached task, so the peer always gets a
/// close frame.
struct ConnectionSlot {
    connection: Option<WsConnection>,
}

impl ConnectionSlot {
    /// Returns the held connection, opening a new one when the slot is empty.
    async fn ensure(&mut self, spec: &RequestSpec) -> Result<&mut WsConnection, WebSocketError> {
        let connection = match self.connection.take() {
            Some(connection) => connection,
            None => WsConnection::connect(spec).await?,
        };
        Ok(self.connection.insert(connection))
    }

    async fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close().await;
        }
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take()
            && let Ok(handle) = Handle::try_current()
        {
            drop(handle.spawn(connection.close()));
        }
    }
}

/// Per-connection state, touched only by the owning worker.
struct WorkerState {
    slot: ConnectionSlot,
    counter: u64,
    quota: u64,
    keep_alive: bool,
}

enum CycleOutcome {
    Emitted,
    Cancelled,
    StreamClosed,
}

/// One simulated WebSocket client: a connection pinged on a fixed schedule
/// until `quota` replies have been judged.
///
/// A reply that misses its deadline may still arrive later and would be read
/// as the answer to the next ping, so the connection is dropped and the next
/// cycle reconnects first.
pub(crate) struct WebSocketWorker {
    pub(crate) id: u64,
    pub(crate) quota: u64,
    pub(crate) keep_alive: bool,
    pub(crate) ping: PingSchedule,
    pub(crate) spec: Arc<RequestSpec>,
    pub(crate) verifier: Arc<dyn WebSocketVerifier>,
    pub(crate) results: mpsc::Sender<RequestResult>,
    pub(crate) completion: CompletionGuard,
}

impl WebSocketWorker {
    pub(crate) async fn run(self, mut shutdown_rx: ShutdownReceiver) {
        let Self {
            id,
            quota,
            keep_alive,
            ping,
            spec,
            verifier,
            results,
            completion,
        } = self;
        debug!("WebSocket worker {} started (quota {})", id, quota);

        let connected = tokio::select! {
            () = wait_for_shutdown(&mut shutdown_rx) => None,
            connected = WsConnection::connect(&spec) => Some(connected),
        };
        let connection = match connected {
            None => {
                debug!("WebSocket worker {} cancelled while connecting", id);
                return;
            }
            Some(Err(err)) => {
                warn!("WebSocket worker {} could not connect: {}", id, err);
                report_unreachable(id, quota, &results).await;
                return;
            }
            Some(Ok(connection)) => connection,
        };

        let mut state = WorkerState {
            slot: ConnectionSlot {
                connection: Some(connection),
            },
            counter: 0,
            quota,
            keep_alive,
        };
        let first_tick = Instant::now()
            .checked_add(ping.first_delay)
            .unwrap_or_else(Instant::now);
        let mut ticker = interval_at(first_tick, ping.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut cancelled = false;
        while state.counter < state.quota {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    cancelled = true;
                    break;
                }
                _ = ticker.tick() => {}
            }

            match ping_cycle(id, &mut state, &spec, verifier.as_ref(), &results, &mut shutdown_rx)
                .await
            {
                CycleOutcome::Emitted => {}
                CycleOutcome::Cancelled => {
                    cancelled = true;
                    break;
                }
                CycleOutcome::StreamClosed => {
                    debug!("WebSocket worker {} stopping: result stream closed", id);
                    break;
                }
            }
        }

        drop(results);
        completion.finish();
        debug!(
            "WebSocket worker {} finished producing after {} attempts",
            id, state.counter
        );

        if state.keep_alive && !cancelled {
            debug!("WebSocket worker {} holding connection open", id);
            wait_for_shutdown(&mut shutdown_rx).await;
        }
        state.slot.close().await;
        debug!("WebSocket worker {} closed its connection", id);
    }
}

async fn ping_cycle(
    id: u64,
    state: &mut WorkerState,
    spec: &RequestSpec,
    verifier: &dyn WebSocketVerifier,
    results: &mpsc::Sender<RequestResult>,
    shutdown_rx: &mut ShutdownReceiver,
) -> CycleOutcome {
    let sequence = state.counter;
    let seq = sequence_id(id, sequence);
    let started = Instant::now();

    let attempt = async {
        let connection = match state.slot.ensure(spec).await {
            Ok(connection) => connection,
            Err(err) => {
                warn!("WebSocket worker {} could not reconnect: {}", id, err);
                return (Verdict::failure(REQUEST_ERROR), false);
            }
        };
        if let Err(err) = connection.send_text(ping_payload(&seq)).await {
            debug!("Ping {} not sent: {}", seq, err);
            return (Verdict::failure(REQUEST_ERROR), false);
        }
        match connection.read_message(spec.timeout).await {
            Ok(message) => (verifier.verify(spec, &seq, &message), false),
            Err(err) => {
                warn!("No usable reply for {}: {}", seq, err);
                let stale = matches!(err, WebSocketError::ReadTimedOut);
                (Verdict::failure(PARSE_ERROR), stale)
            }
        }
    };

    let (verdict, stale, cancelled) = tokio::select! {
        () = wait_for_shutdown(shutdown_rx) => (Verdict::failure(REQUEST_ERROR), false, true),
        (verdict, stale) = attempt => (verdict, stale, false),
    };
    let latency = started.elapsed();
    state.counter = state.counter.saturating_add(1);
    if stale {
        debug!("WebSocket worker {} dropping connection after {}", id, seq);
        state.slot.close().await;
    }

    let result = RequestResult::new(id, sequence, latency, verdict.success, verdict.code);
    if results.send(result).await.is_err() {
        return CycleOutcome::StreamClosed;
    }
    if cancelled {
        CycleOutcome::Cancelled
    } else {
        CycleOutcome::Emitted
    }
}

async fn report_unreachable(id: u64, quota: u64, results: &mpsc::Sender<RequestResult>) {
    for sequence in 0..quota {
        if results
            .send(RequestResult::failed(id, sequence, REQUEST_ERROR))
            .await
            .is_err()
        {
            break;
        }
    }
}
