use tokio::sync::broadcast;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

/// Resolves once shutdown has been requested. A closed or lagged channel
/// counts as a request.
pub async fn wait_for_shutdown(shutdown_rx: &mut ShutdownReceiver) {
    drop(shutdown_rx.recv().await);
}

/// Non-blocking check used between attempts.
pub fn shutdown_requested(shutdown_rx: &mut ShutdownReceiver) -> bool {
    !matches!(
        shutdown_rx.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    )
}
