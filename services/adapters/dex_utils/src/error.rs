//! Error types for swap parameter extraction

use thiserror::Error;

use crate::abi::AbiError;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that abort extraction of a single transaction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Destination is not a registered router; nothing was decoded
    #[error("Router not recognized: {0}")]
    RouterNotRecognized(String),

    /// The ABI decoder rejected the call data
    #[error("Decode failure: {0}")]
    DecodeFailure(#[from] AbiError),

    /// Command bytes given as hex with an odd number of digits
    #[error("Malformed command blob: odd hex length {len}")]
    MalformedCommandBlob { len: usize },

    /// Nested call data exceeds the configured recursion bound
    #[error("Recursion limit exceeded: depth {depth} > limit {limit}")]
    RecursionLimitExceeded { depth: usize, limit: usize },

    /// A named parameter the strategy requires is absent or mistyped
    #[error("Missing required parameter: {0}")]
    ParameterMissing(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown router family: {0}")]
    UnknownRouterFamily(String),
}
