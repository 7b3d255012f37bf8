//! In-process servers and runtime helpers shared by unit tests.
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use crate::error::{AppError, AppResult};

pub(crate) const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

/// Awaits `future` under [`TEST_TIMEOUT`].
pub(crate) async fn within<F, T>(what: &'static str, future: F) -> AppResult<T>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, future)
        .await
        .map_err(|_elapsed| AppError::validation(format!("Timed out waiting for {}", what)))
}

pub(crate) struct HttpServer {
    pub(crate) url: String,
    /// Raw request heads (and whatever body arrived with them).
    pub(crate) requests: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<()>,
}

impl Drop for HttpServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Serves `status` with `body` to every connection, then closes it.
pub(crate) async fn spawn_http_server(status: u16, body: &'static str) -> AppResult<HttpServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (requests_tx, requests) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let requests_tx = requests_tx.clone();
            tokio::spawn(serve_http(stream, status, body, requests_tx));
        }
    });

    Ok(HttpServer {
        url: format!("http://{}", addr),
        requests,
        task,
    })
}

async fn serve_http(
    mut stream: TcpStream,
    status: u16,
    body: &'static str,
    requests_tx: mpsc::UnboundedSender<String>,
) {
    let mut buffer = vec![0u8; 8192];
    let Ok(read) = stream.read(&mut buffer).await else {
        return;
    };
    let head = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default()).into_owned();
    drop(requests_tx.send(head));

    let response = format!(
        "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).await.is_err() {
        return;
    }
    drop(stream.shutdown().await);
}

/// Address on which nothing is listening.
pub(crate) async fn unused_addr() -> AppResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PingReply {
    /// Echo the ping's seq with code 200.
    Echo,
    /// Reply with a seq the client never sent.
    WrongSeq,
    /// Record pings but never answer them.
    Silent,
    /// Send a close frame right after the handshake.
    CloseAfterHandshake,
    /// Echo, but hold the first reply this server sends by the given delay.
    LateFirst(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WsEvent {
    Ping(String),
    /// The client sent a close frame.
    Closed,
    /// The connection ended without a close frame.
    Dropped,
}

pub(crate) struct WsServer {
    pub(crate) url: String,
    pub(crate) events: mpsc::UnboundedReceiver<WsEvent>,
    task: JoinHandle<()>,
}

impl Drop for WsServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Accepts WebSocket clients and answers every ping frame per `reply`.
pub(crate) async fn spawn_ws_server(reply: PingReply) -> AppResult<WsServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (events_tx, events) = mpsc::unbounded_channel();
    let first_reply_held = Arc::new(AtomicBool::new(false));

    let task = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let events_tx = events_tx.clone();
            let first_reply_held = Arc::clone(&first_reply_held);
            tokio::spawn(serve_ws(stream, reply, events_tx, first_reply_held));
        }
    });

    Ok(WsServer {
        url: format!("ws://{}", addr),
        events,
        task,
    })
}

async fn serve_ws(
    stream: TcpStream,
    reply: PingReply,
    events_tx: mpsc::UnboundedSender<WsEvent>,
    first_reply_held: Arc<AtomicBool>,
) {
    let Ok(mut socket) = accept_async(stream).await else {
        return;
    };
    if reply == PingReply::CloseAfterHandshake {
        drop(socket.close(None).await);
    }
    while let Some(Ok(message)) = socket.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => {
                drop(events_tx.send(WsEvent::Closed));
                return;
            }
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
                continue;
            }
        };
        let seq = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|value| value.get("seq").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_default();
        drop(events_tx.send(WsEvent::Ping(seq.clone())));

        let reply_seq = match reply {
            PingReply::Echo | PingReply::LateFirst(_) => seq,
            PingReply::WrongSeq => format!("{}-other", seq),
            PingReply::Silent | PingReply::CloseAfterHandshake => continue,
        };
        if let PingReply::LateFirst(delay) = reply
            && !first_reply_held.swap(true, Ordering::SeqCst)
        {
            tokio::time::sleep(delay).await;
        }
        let body = format!(
            r#"{{"seq":"{}","cmd":"ping","response":{{"code":200,"codeMsg":"ok","data":{{}}}}}}"#,
            reply_seq
        );
        if socket.send(Message::Text(body)).await.is_err() {
            break;
        }
    }
    drop(events_tx.send(WsEvent::Dropped));
}
