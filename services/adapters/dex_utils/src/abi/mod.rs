//! ABI definitions and call data decoding for DEX routers
//!
//! This module provides:
//! - Function fragments that keep parameter and struct field names
//! - A selector-indexed decoder producing [`DecodedCall`] trees
//! - Bundled router ABIs used when no explorer or local ABI is available
//!
//! # Supported Routers
//! - Uniswap V2 router and forks (flat `path` / `deadline`)
//! - Uniswap V3 SwapRouter and SwapRouter02 (struct params, multicall)
//! - Uniswap Universal Router (`execute` with command-encoded inputs)

pub mod call;
pub mod decoder;
pub mod fragment;
pub mod uniswap_v2;
pub mod uniswap_v3;
pub mod universal_router;

pub use call::{find_parameter, DecodedCall, Parameter, Scalar, Value};
pub use decoder::{AbiDecoder, AbiError, CallDecoder};
pub use fragment::{parse_abi_json, AbiParam, FunctionFragment};

use crate::router_registry::RouterFamily;

/// Bundled ABI fragments for a router family
pub fn bundled_functions(family: RouterFamily) -> Vec<FunctionFragment> {
    match family {
        RouterFamily::Generic => uniswap_v2::router_functions(),
        RouterFamily::StructSingleHop => {
            let mut functions = uniswap_v3::swap_router_functions();
            functions.extend(uniswap_v3::swap_router02_functions());
            functions
        }
        RouterFamily::Command => universal_router::router_functions(),
    }
}

/// Decoder preloaded with every bundled router ABI
pub fn bundled_decoder() -> Result<AbiDecoder, AbiError> {
    let mut decoder = AbiDecoder::new();
    for family in RouterFamily::ALL {
        for fragment in bundled_functions(family) {
            decoder.add_fragment(fragment)?;
        }
    }
    Ok(decoder)
}
