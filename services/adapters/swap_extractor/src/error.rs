//! Error types for the swap extraction service

use dex::{AbiError, ExtractionError};
use thiserror::Error;

/// Errors while obtaining a router's ABI
#[derive(Debug, Error)]
pub enum AbiSourceError {
    /// The block explorer has no verified ABI for the contract, or refused
    /// the request
    #[error("ABI unavailable for {address}: {reason}")]
    AbiUnavailable {
        /// Router address the ABI was requested for
        address: String,
        reason: String,
    },

    #[error("Explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read ABI file {path}: {reason}")]
    AbiFile { path: String, reason: String },

    #[error("Invalid ABI: {0}")]
    InvalidAbi(#[from] AbiError),

    /// Router address or family in the configuration is unusable
    #[error("Invalid router entry: {0}")]
    InvalidRouter(#[from] ExtractionError),
}

/// Errors while fetching transactions from a node
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("Transaction not found: {0}")]
    NotFound(String),

    /// Contract creations have no destination router
    #[error("Transaction {0} creates a contract")]
    ContractCreation(String),

    #[error("RPC request failed: {0}")]
    Rpc(#[from] web3::Error),

    #[error("Invalid feed message: {0}")]
    InvalidMessage(String),
}
