//! Extraction orchestrator
//!
//! Classifies a transaction's destination, decodes its call data once and
//! runs the family's extraction strategy for the swap path and deadline.

use std::fmt;
use std::sync::Arc;

use ethereum_types::{Address, U256};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::abi::{CallDecoder, Value};
use crate::error::{ExtractionError, Result};
use crate::extractor::{SwapParameterExtractor, ValueKind};
use crate::path::path_addresses;
use crate::router_registry::{format_address, RouterFamily, RouterRegistry};

/// Default bound on nested call data (multicall payloads, command inputs)
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Raw transaction input as received from a node or feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCallData {
    pub destination: Address,
    pub data: Vec<u8>,
    pub hash: Option<String>,
}

impl TransactionCallData {
    pub fn new(destination: Address, data: Vec<u8>) -> Self {
        Self {
            destination,
            data,
            hash: None,
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// Conditions that leave a record incomplete without failing extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionIssue {
    /// Fewer than two tokens; input and output token are undefined
    PathTooShort { len: usize },
    DeadlineMissing,
}

impl fmt::Display for ExtractionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionIssue::PathTooShort { len } => write!(f, "path too short ({} tokens)", len),
            ExtractionIssue::DeadlineMissing => f.write_str("deadline missing"),
        }
    }
}

/// Swap parameters of one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapExtraction {
    pub path: Vec<Address>,
    pub deadline: Option<U256>,
    pub source_hash: Option<String>,
    pub family: RouterFamily,
    pub issues: Vec<ExtractionIssue>,
}

impl SwapExtraction {
    fn new(
        path: Vec<Address>,
        deadline: Option<U256>,
        source_hash: Option<String>,
        family: RouterFamily,
    ) -> Self {
        let mut issues = Vec::new();
        if path.len() < 2 {
            issues.push(ExtractionIssue::PathTooShort { len: path.len() });
        }
        if deadline.is_none() {
            issues.push(ExtractionIssue::DeadlineMissing);
        }
        Self {
            path,
            deadline,
            source_hash,
            family,
            issues,
        }
    }

    pub fn input_token(&self) -> Option<Address> {
        if self.is_path_too_short() {
            return None;
        }
        self.path.first().copied()
    }

    pub fn output_token(&self) -> Option<Address> {
        if self.is_path_too_short() {
            return None;
        }
        self.path.last().copied()
    }

    pub fn is_path_too_short(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, ExtractionIssue::PathTooShort { .. }))
    }
}

/// JSON form of a [`SwapExtraction`]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    swap_path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline: Option<String>,
}

impl Serialize for SwapExtraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        SwapRecord {
            hash: self.source_hash.clone(),
            swap_path: self.path.iter().map(format_address).collect(),
            input_token: self.input_token().as_ref().map(format_address),
            output_token: self.output_token().as_ref().map(format_address),
            deadline: self.deadline.map(|deadline| deadline.to_string()),
        }
        .serialize(serializer)
    }
}

/// Router-aware swap extraction over a shared registry and decoder
#[derive(Clone)]
pub struct SwapExtractor {
    registry: Arc<RouterRegistry>,
    decoder: Arc<dyn CallDecoder>,
    max_depth: usize,
}

impl SwapExtractor {
    pub fn new(registry: Arc<RouterRegistry>, decoder: Arc<dyn CallDecoder>) -> Self {
        Self {
            registry,
            decoder,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &RouterRegistry {
        &self.registry
    }

    pub fn is_router(&self, address: &Address) -> bool {
        self.registry.classify(address).is_some()
    }

    pub fn extract(&self, tx: &TransactionCallData) -> Result<SwapExtraction> {
        let family = self
            .registry
            .classify(&tx.destination)
            .ok_or_else(|| ExtractionError::RouterNotRecognized(format_address(&tx.destination)))?;

        let call = self.decoder.decode_call(&tx.data)?;
        debug!("Decoded {} for {} router", call.function_name, family);

        let extractor = SwapParameterExtractor::new(self.decoder.as_ref(), self.max_depth);
        let path = extractor
            .extract(ValueKind::Path, &call, family)?
            .map(|value| path_addresses(&value))
            .unwrap_or_default();
        let deadline = extractor
            .extract(ValueKind::Deadline, &call, family)?
            .and_then(|value| earliest_deadline(&value));

        let extraction = SwapExtraction::new(path, deadline, tx.hash.clone(), family);
        for issue in &extraction.issues {
            debug!("{}: {}", format_address(&tx.destination), issue);
        }
        Ok(extraction)
    }
}

/// A batch can carry one deadline per sub-call; the earliest one binds
fn earliest_deadline(value: &Value) -> Option<U256> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(earliest_deadline).min(),
        other => other.as_uint(),
    }
}
