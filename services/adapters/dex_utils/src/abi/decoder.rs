//! Selector-indexed call data decoder
//!
//! Holds the function fragments of every registered router ABI, keyed by
//! selector, and turns raw call data into a [`DecodedCall`]. The decoder is
//! populated once at startup and only read afterwards, so a single instance
//! can be shared across threads.

use std::collections::HashMap;

use ethabi::ParamType;
use tracing::debug;

use super::call::{DecodedCall, Parameter, Value};
use super::fragment::{parse_abi_json, FunctionFragment};

/// Error types for ABI handling and call data decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    #[error("Invalid ABI JSON: {0}")]
    InvalidJson(String),

    #[error("Unsupported ABI type: {0}")]
    UnsupportedType(String),

    #[error("Call data too short for a selector: {len} bytes")]
    TruncatedInput { len: usize },

    #[error("Unknown function selector: 0x{0}")]
    UnknownSelector(String),

    #[error("Failed to decode {function}: {reason}")]
    Decode { function: String, reason: String },
}

/// ABI-decode capability used by the extraction core
pub trait CallDecoder: Send + Sync {
    fn decode_call(&self, data: &[u8]) -> Result<DecodedCall, AbiError>;
}

#[derive(Debug, Clone)]
struct RegisteredFunction {
    fragment: FunctionFragment,
    types: Vec<ParamType>,
}

/// Decoder over a set of ABI fragments
#[derive(Debug, Clone, Default)]
pub struct AbiDecoder {
    functions: HashMap<[u8; 4], RegisteredFunction>,
}

impl AbiDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a decoder from fragments, failing on the first unusable one
    pub fn with_fragments(
        fragments: impl IntoIterator<Item = FunctionFragment>,
    ) -> Result<Self, AbiError> {
        let mut decoder = Self::new();
        for fragment in fragments {
            decoder.add_fragment(fragment)?;
        }
        Ok(decoder)
    }

    /// Register one function; returns its selector
    pub fn add_fragment(&mut self, fragment: FunctionFragment) -> Result<[u8; 4], AbiError> {
        let selector = fragment.selector()?;
        let types = fragment.param_types()?;
        self.functions
            .insert(selector, RegisteredFunction { fragment, types });
        Ok(selector)
    }

    /// Register every function of a JSON ABI; returns how many were added.
    ///
    /// Functions with unsupported parameter types are skipped so one exotic
    /// entry does not make a whole router ABI unusable.
    pub fn add_abi_json(&mut self, json: &str) -> Result<usize, AbiError> {
        let mut added = 0;
        for fragment in parse_abi_json(json)? {
            let name = fragment.name.clone();
            match self.add_fragment(fragment) {
                Ok(_) => added += 1,
                Err(e) => debug!("Skipping ABI function {}: {}", name, e),
            }
        }
        Ok(added)
    }

    pub fn contains(&self, selector: &[u8; 4]) -> bool {
        self.functions.contains_key(selector)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl CallDecoder for AbiDecoder {
    fn decode_call(&self, data: &[u8]) -> Result<DecodedCall, AbiError> {
        if data.len() < 4 {
            return Err(AbiError::TruncatedInput { len: data.len() });
        }

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);

        let function = self
            .functions
            .get(&selector)
            .ok_or_else(|| AbiError::UnknownSelector(hex::encode(selector)))?;

        let tokens = ethabi::decode(&function.types, &data[4..]).map_err(|e| AbiError::Decode {
            function: function.fragment.name.clone(),
            reason: e.to_string(),
        })?;

        let parameters = function
            .fragment
            .inputs
            .iter()
            .zip(tokens)
            .map(|(param, token)| Parameter {
                name: param.name.clone(),
                value: Value::from_token(token, param),
            })
            .collect();

        Ok(DecodedCall {
            function_name: function.fragment.name.clone(),
            parameters,
        })
    }
}
