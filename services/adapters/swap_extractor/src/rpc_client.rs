//! RPC client for transaction lookup
//!
//! Fetches transactions by hash over HTTP JSON-RPC and turns them into the
//! call data the extractor works on.

use dex::TransactionCallData;
use tracing::debug;
use web3::transports::Http;
use web3::types::{Transaction, TransactionId, H256};
use web3::Web3;

use crate::error::FetchError;

pub struct RpcClient {
    web3: Web3<Http>,
}

impl RpcClient {
    pub fn new(url: &str) -> Result<Self, FetchError> {
        let transport = Http::new(url)?;
        Ok(Self {
            web3: Web3::new(transport),
        })
    }

    /// Transaction by hash; `Ok(None)` when the node does not know it
    pub async fn transaction(&self, hash: H256) -> Result<Option<Transaction>, FetchError> {
        Ok(self
            .web3
            .eth()
            .transaction(TransactionId::Hash(hash))
            .await?)
    }

    /// Call data of the transaction with `hash`
    pub async fn fetch_call_data(&self, hash: H256) -> Result<TransactionCallData, FetchError> {
        let tx = self
            .transaction(hash)
            .await?
            .ok_or_else(|| FetchError::NotFound(format_hash(&hash)))?;
        debug!("Fetched transaction {}", format_hash(&hash));
        call_data_from_transaction(&tx)
    }
}

/// Destination and input of a transaction; contract creations are rejected
pub fn call_data_from_transaction(tx: &Transaction) -> Result<TransactionCallData, FetchError> {
    let hash = format_hash(&tx.hash);
    let destination = tx
        .to
        .ok_or_else(|| FetchError::ContractCreation(hash.clone()))?;

    Ok(TransactionCallData::new(destination, tx.input.0.clone()).with_hash(hash))
}

/// Parse a 32-byte transaction hash, `0x` prefix optional
pub fn parse_tx_hash(hash: &str) -> Result<H256, FetchError> {
    let digits = hash.trim().trim_start_matches("0x");
    let bytes = hex::decode(digits).map_err(|_| FetchError::InvalidHash(hash.to_string()))?;
    if bytes.len() != 32 {
        return Err(FetchError::InvalidHash(hash.to_string()));
    }
    Ok(H256::from_slice(&bytes))
}

pub fn format_hash(hash: &H256) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}
