//! Router registry
//!
//! Maps known router contract addresses to the call data convention they
//! use. Built once at startup and read-only afterwards; share it behind an
//! `Arc` across concurrent extractions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use ethereum_types::Address;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Call data convention of a router contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterFamily {
    /// Flat parameters: `path` and `deadline` are top-level arguments (Uniswap V2 style)
    Generic,
    /// Command-encoded `execute(commands, inputs, deadline)` (Universal Router)
    Command,
    /// Struct parameters and multicall batches (Uniswap V3 SwapRouter style)
    StructSingleHop,
}

impl RouterFamily {
    pub const ALL: [RouterFamily; 3] = [
        RouterFamily::Generic,
        RouterFamily::Command,
        RouterFamily::StructSingleHop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouterFamily::Generic => "generic",
            RouterFamily::Command => "command",
            RouterFamily::StructSingleHop => "struct_single_hop",
        }
    }
}

impl fmt::Display for RouterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouterFamily {
    type Err = ExtractionError;

    /// Accepts the canonical names plus the router group names used in
    /// configuration files (`universal`, `uniswap_v2`, `uniswap_v3`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "uniswap_v2" | "uniswapv2" | "v2" => Ok(RouterFamily::Generic),
            "command" | "universal" | "universal_router" => Ok(RouterFamily::Command),
            "struct_single_hop" | "uniswap_v3" | "uniswapv3" | "v3" => {
                Ok(RouterFamily::StructSingleHop)
            }
            other => Err(ExtractionError::UnknownRouterFamily(other.to_string())),
        }
    }
}

/// A router contract and its family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouterDescriptor {
    pub address: Address,
    pub family: RouterFamily,
}

impl RouterDescriptor {
    pub fn new(address: Address, family: RouterFamily) -> Self {
        Self { address, family }
    }

    /// Parse a hex address in any letter case
    pub fn parse(address: &str, family: RouterFamily) -> Result<Self, ExtractionError> {
        Ok(Self::new(parse_address(address)?, family))
    }
}

/// Immutable address → family table
#[derive(Debug, Clone, Default)]
pub struct RouterRegistry {
    routers: HashMap<Address, RouterFamily>,
}

impl RouterRegistry {
    pub fn new(descriptors: impl IntoIterator<Item = RouterDescriptor>) -> Self {
        Self {
            routers: descriptors
                .into_iter()
                .map(|d| (d.address, d.family))
                .collect(),
        }
    }

    /// Family of the router at `address`, `None` when it is not registered
    pub fn classify(&self, address: &Address) -> Option<RouterFamily> {
        self.routers.get(address).copied()
    }

    /// [`classify`](Self::classify) for a hex string; malformed input is unknown
    pub fn classify_str(&self, address: &str) -> Option<RouterFamily> {
        parse_address(address)
            .ok()
            .and_then(|address| self.classify(&address))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = RouterDescriptor> + '_ {
        self.routers
            .iter()
            .map(|(address, family)| RouterDescriptor::new(*address, *family))
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}

/// Parse a 20-byte hex address, with or without `0x`, in any letter case
pub fn parse_address(address: &str) -> Result<Address, ExtractionError> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(digits.to_ascii_lowercase())
        .map_err(|_| ExtractionError::InvalidAddress(address.to_string()))?;
    if bytes.len() != 20 {
        return Err(ExtractionError::InvalidAddress(address.to_string()));
    }
    Ok(Address::from_slice(&bytes))
}

/// `0x`-prefixed lowercase hex form of an address
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}
