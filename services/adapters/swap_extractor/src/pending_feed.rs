//! Pending transaction feed
//!
//! Subscribes to `newPendingTransactions` over a node WebSocket and forwards
//! each announced hash. On any socket error, close or refused subscription
//! the connection is re-established after the configured delay.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use web3::types::H256;

use crate::error::FetchError;
use crate::rpc_client::parse_tx_hash;

const SUBSCRIPTION_REQUEST_ID: u64 = 1;

/// Decoded WebSocket message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    /// Subscription confirmed, with its id
    Subscribed(String),
    /// Node refused the subscription request
    SubscriptionRejected(String),
    PendingTransaction(H256),
    /// Anything else the node sends
    Other,
}

/// `eth_subscribe` request for pending transaction hashes
pub fn subscribe_request() -> String {
    json!({
        "jsonrpc": "2.0",
        "id": SUBSCRIPTION_REQUEST_ID,
        "method": "eth_subscribe",
        "params": ["newPendingTransactions"]
    })
    .to_string()
}

pub fn parse_feed_message(message: &str) -> Result<FeedMessage, FetchError> {
    let json_value: serde_json::Value = serde_json::from_str(message)
        .map_err(|e| FetchError::InvalidMessage(e.to_string()))?;

    if let Some(error) = json_value.get("error") {
        if json_value.get("id").and_then(|id| id.as_u64()) == Some(SUBSCRIPTION_REQUEST_ID) {
            return Ok(FeedMessage::SubscriptionRejected(error.to_string()));
        }
        return Err(FetchError::InvalidMessage(error.to_string()));
    }

    // Handle subscription notifications
    if json_value.get("method").and_then(|m| m.as_str()) == Some("eth_subscription") {
        return match json_value
            .get("params")
            .and_then(|params| params.get("result"))
            .and_then(|result| result.as_str())
        {
            Some(hash) => Ok(FeedMessage::PendingTransaction(parse_tx_hash(hash)?)),
            None => Ok(FeedMessage::Other),
        };
    }

    if json_value.get("id").and_then(|id| id.as_u64()) == Some(SUBSCRIPTION_REQUEST_ID) {
        if let Some(id) = json_value.get("result").and_then(|r| r.as_str()) {
            return Ok(FeedMessage::Subscribed(id.to_string()));
        }
    }

    Ok(FeedMessage::Other)
}

pub struct PendingTransactionFeed {
    ws_url: String,
    reconnect_delay: Duration,
}

impl PendingTransactionFeed {
    pub fn new(ws_url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            ws_url: ws_url.into(),
            reconnect_delay,
        }
    }

    /// Forward pending hashes to `sender` until the receiving side is dropped
    pub async fn run(&self, sender: mpsc::Sender<H256>) {
        loop {
            match self.stream_once(&sender).await {
                Ok(()) if sender.is_closed() => {
                    info!("Pending transaction consumer gone, stopping feed");
                    return;
                }
                Ok(()) => warn!("WebSocket connection closed"),
                Err(e) => error!("WebSocket error: {}", e),
            }

            warn!(
                "Unable to stay connected to {}, retrying in {:?}",
                self.ws_url, self.reconnect_delay
            );
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// One connection: subscribe, then forward until the socket ends
    async fn stream_once(&self, sender: &mpsc::Sender<H256>) -> anyhow::Result<()> {
        info!("Connecting to {}", self.ws_url);
        let (ws_stream, _) = connect_async(self.ws_url.as_str()).await?;
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        ws_sender.send(Message::Text(subscribe_request())).await?;

        while let Some(message) = ws_receiver.next().await {
            match message? {
                Message::Text(text) => match parse_feed_message(&text) {
                    Ok(FeedMessage::PendingTransaction(hash)) => {
                        if sender.send(hash).await.is_err() {
                            return Ok(());
                        }
                    }
                    Ok(FeedMessage::Subscribed(id)) => {
                        info!("Subscribed to pending transactions ({})", id)
                    }
                    Ok(FeedMessage::SubscriptionRejected(reason)) => {
                        anyhow::bail!("Subscription rejected: {}", reason)
                    }
                    Ok(FeedMessage::Other) => {}
                    Err(e) => debug!("Ignoring feed message: {}", e),
                },
                Message::Ping(payload) => ws_sender.send(Message::Pong(payload)).await?,
                Message::Close(_) => break,
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_request() {
        let request: serde_json::Value = serde_json::from_str(&subscribe_request()).unwrap();
        assert_eq!(request["method"], "eth_subscribe");
        assert_eq!(request["params"][0], "newPendingTransactions");
    }

    #[test]
    fn test_parse_notification() {
        let message = r#"{"jsonrpc":"2.0","method":"eth_subscription","params":{"subscription":"0xcd0c3e8af590364c09d0fa6a1210faf5","result":"0x88bc181ceaec34f47237431ccda851f773288d5671edda23b5cecf1379645244"}}"#;

        match parse_feed_message(message).unwrap() {
            FeedMessage::PendingTransaction(hash) => assert_eq!(hash.as_bytes()[0], 0x88),
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_parse_subscription_confirmation() {
        let message = r#"{"jsonrpc":"2.0","id":1,"result":"0xcd0c3e8af590364c09d0fa6a1210faf5"}"#;
        assert_eq!(
            parse_feed_message(message).unwrap(),
            FeedMessage::Subscribed("0xcd0c3e8af590364c09d0fa6a1210faf5".to_string())
        );
    }

    #[test]
    fn test_parse_subscription_rejection() {
        let error = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"not supported"}}"#;
        match parse_feed_message(error).unwrap() {
            FeedMessage::SubscriptionRejected(reason) => assert!(reason.contains("not supported")),
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_errors_and_garbage() {
        let error = r#"{"jsonrpc":"2.0","id":7,"error":{"code":-32000,"message":"busy"}}"#;
        assert!(parse_feed_message(error).is_err());
        assert!(parse_feed_message("not json").is_err());
        assert_eq!(
            parse_feed_message(r#"{"jsonrpc":"2.0","id":7,"result":true}"#).unwrap(),
            FeedMessage::Other
        );
    }
}
