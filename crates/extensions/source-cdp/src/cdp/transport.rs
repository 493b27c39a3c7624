//! Shared WebSocket transport with request/response correlation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{CdpMessage, CdpRequest};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
pub(crate) type WsSource = SplitStream<WsStream>;

type Pending = Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>;

pub(crate) const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) struct Transport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    pending: Pending,
    next_id: AtomicU64,
    timeout: Duration,
}

impl Transport {
    pub(crate) fn new(ws_tx: WsSink, timeout: Duration) -> Self {
        Self {
            ws_tx: tokio::sync::Mutex::new(ws_tx),
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    /// Send a command, optionally scoped to an attached session, and wait for its result.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        };
        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        let sent = {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(json.into())).await
        };
        if let Err(e) = sent {
            self.pending.lock().remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    pub(crate) async fn close(&self) {
        let mut ws = self.ws_tx.lock().await;
        if let Err(e) = ws.close().await {
            debug!("WebSocket close: {}", e);
        }
    }

    /// Route responses to their waiters until the socket closes.
    ///
    /// Events are not consumed by the feed backend and are dropped.
    pub(crate) async fn receive_loop(&self, mut ws_source: WsSource) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpMessage>(&text) {
                        Ok(message) => self.dispatch(message),
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
        // Dropping the senders wakes every waiter with SessionClosed.
        self.pending.lock().clear();
    }

    fn dispatch(&self, message: CdpMessage) {
        let Some(id) = message.id else {
            if let Some(method) = message.method {
                trace!("CDP event {} ({:?})", method, message.session_id);
            }
            return;
        };
        let Some(tx) = self.pending.lock().remove(&id) else {
            return;
        };
        let result = match message.error {
            Some(error) => Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            }),
            None => Ok(message.result.unwrap_or(Value::Null)),
        };
        let _ = tx.send(result);
    }
}
