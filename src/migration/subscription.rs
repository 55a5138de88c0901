//! Log Subscription
//!
//! Purpose:
//!     Source of raw log notifications for the watcher. The trait is the seam
//!     the watcher depends on; `WsLogSubscription` is the Solana JSON-RPC
//!     implementation (`logsSubscribe` with a `mentions` filter).
//!
//! Created: 2026-10-17
//!
//! Notes:
//!     - The returned stream owns the socket; dropping it closes the connection
//!     - Transport errors and JSON-RPC errors surface as SubscriptionFailure
//!     - Subscription acks and unrelated frames are skipped

use super::types::RawLogNotification;
use crate::error::{ForensicsError, Result};
use async_trait::async_trait;
use futures::{SinkExt, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::pin::Pin;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// A stream of raw notifications produced by a subscription
pub type LogStream<'a> = Pin<Box<dyn Stream<Item = Result<RawLogNotification>> + Send + 'a>>;

/// Subscription trait - produces the notification stream the watcher consumes
#[async_trait]
pub trait LogSubscription: Send + Sync {
    /// Open the subscription. Connection failures are `SubscriptionFailure`.
    async fn subscribe(&self) -> Result<LogStream<'static>>;
}

/// What one WebSocket text frame turned out to be
#[derive(Debug, PartialEq)]
pub enum Frame {
    /// `{"id":..,"result":<subscription id>}`
    Ack { subscription_id: u64 },
    Notification(RawLogNotification),
    RpcError(String),
    /// Anything else (other methods, invalid JSON)
    Ignored,
}

/// Loosely typed so a bad payload cannot hide which method it belongs to
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    method: Option<Value>,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct NotificationParams {
    result: NotificationResult,
}

#[derive(Debug, Deserialize)]
struct NotificationResult {
    #[serde(default)]
    context: Option<NotificationContext>,
    value: NotificationValue,
}

#[derive(Debug, Deserialize)]
struct NotificationContext {
    slot: u64,
}

#[derive(Debug, Deserialize)]
struct NotificationValue {
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    err: Option<Value>,
    #[serde(default)]
    logs: Option<Vec<String>>,
}

/// Classify one text frame from the RPC socket
pub fn parse_frame(text: &str) -> Frame {
    let envelope: RpcEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "skipping invalid ws frame");
            return Frame::Ignored;
        }
    };

    if let Some(err) = envelope.error {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Frame::RpcError(format!("rpc error {}: {}", code, message));
    }

    if envelope.id.is_some() {
        if let Some(subscription_id) = envelope.result.as_ref().and_then(Value::as_u64) {
            return Frame::Ack { subscription_id };
        }
    }

    if envelope.method.as_ref().and_then(Value::as_str) != Some("logsNotification") {
        return Frame::Ignored;
    }

    let params = envelope.params.unwrap_or(Value::Null);
    match serde_json::from_value::<NotificationParams>(params) {
        Ok(params) => {
            let value = params.result.value;
            Frame::Notification(RawLogNotification {
                signature: value.signature,
                logs: value.logs,
                slot: params.result.context.map(|c| c.slot),
                failed: value.err.map(|e| !e.is_null()).unwrap_or(false),
            })
        }
        // Keep it flowing so the watcher counts it as malformed
        Err(e) => {
            warn!(error = %e, "undecodable logsNotification payload");
            Frame::Notification(RawLogNotification::default())
        }
    }
}

/// Build the `logsSubscribe` request for `program`
pub fn logs_subscribe_request(id: u64, program: &str, commitment: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "logsSubscribe",
        "params": [
            { "mentions": [program] },
            { "commitment": commitment }
        ]
    })
}

/// Solana RPC WebSocket subscription to logs mentioning one program
#[derive(Debug, Clone)]
pub struct WsLogSubscription {
    ws_url: String,
    program: String,
    commitment: String,
}

impl WsLogSubscription {
    pub fn new(
        ws_url: impl Into<String>,
        program: impl Into<String>,
        commitment: impl Into<String>,
    ) -> Self {
        Self {
            ws_url: ws_url.into(),
            program: program.into(),
            commitment: commitment.into(),
        }
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }
}

#[async_trait]
impl LogSubscription for WsLogSubscription {
    async fn subscribe(&self) -> Result<LogStream<'static>> {
        let (mut ws, _response) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| {
                ForensicsError::SubscriptionFailure(format!("connect {}: {}", self.ws_url, e))
            })?;

        let request = logs_subscribe_request(1, &self.program, &self.commitment);
        ws.send(Message::Text(request.to_string()))
            .await
            .map_err(|e| ForensicsError::SubscriptionFailure(format!("logsSubscribe send: {}", e)))?;

        info!(
            ws_url = %self.ws_url,
            program = %self.program,
            commitment = %self.commitment,
            "logsSubscribe sent"
        );

        // Once a failure is yielded the stream ends
        let stream = futures::stream::unfold(Some(ws), |state| async move {
            let mut ws = state?;
            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => match parse_frame(&text) {
                        Frame::Notification(raw) => return Some((Ok(raw), Some(ws))),
                        Frame::Ack { subscription_id } => {
                            debug!(subscription_id, "logsSubscribe acknowledged");
                        }
                        Frame::RpcError(msg) => {
                            return Some((Err(ForensicsError::SubscriptionFailure(msg)), None));
                        }
                        Frame::Ignored => {}
                    },
                    Some(Ok(Message::Close(frame))) => {
                        warn!(?frame, "RPC closed the websocket");
                        return None;
                    }
                    // Ping/pong are answered by tungstenite on the next read
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        return Some((
                            Err(ForensicsError::SubscriptionFailure(format!("websocket: {}", e))),
                            None,
                        ));
                    }
                    None => return None,
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
