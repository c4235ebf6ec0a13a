//! Function selector constants
//!
//! First four bytes of keccak256 over the canonical function signature. The
//! Universal Router command selectors are synthetic: they are the selectors
//! of the functions in [`crate::abi::universal_router`], which exist only so
//! that command payloads can be decoded as ordinary call data.

// =============================================================================
// Universal Router synthetic command selectors
// =============================================================================

/// keccak256("V3_SWAP_EXACT_IN(address,uint256,uint256,bytes,bool)")
pub const V3_SWAP_EXACT_IN: [u8; 4] = [0xde, 0x78, 0x0d, 0x8a];

/// keccak256("V3_SWAP_EXACT_OUT(address,uint256,uint256,bytes,bool)")
pub const V3_SWAP_EXACT_OUT: [u8; 4] = [0x2b, 0xf6, 0x65, 0xc1];

/// keccak256("V2_SWAP_EXACT_IN(address,uint256,uint256,address[],bool)")
pub const V2_SWAP_EXACT_IN: [u8; 4] = [0x3b, 0xd2, 0xd8, 0x79];

/// keccak256("V2_SWAP_EXACT_OUT(address,uint256,uint256,address[],bool)")
pub const V2_SWAP_EXACT_OUT: [u8; 4] = [0xff, 0x07, 0xac, 0xb8];

// =============================================================================
// Router entry points
// =============================================================================

/// keccak256("execute(bytes,bytes[],uint256)")
pub const UNIVERSAL_EXECUTE_DEADLINE: [u8; 4] = [0x35, 0x93, 0x56, 0x4c];

/// keccak256("execute(bytes,bytes[])")
pub const UNIVERSAL_EXECUTE: [u8; 4] = [0x24, 0x85, 0x6b, 0xc3];

/// keccak256("swapExactTokensForTokens(uint256,uint256,address[],address,uint256)")
pub const V2_SWAP_EXACT_TOKENS_FOR_TOKENS: [u8; 4] = [0x38, 0xed, 0x17, 0x39];

/// keccak256("exactInputSingle((address,address,uint24,address,uint256,uint256,uint256,uint160))")
pub const V3_EXACT_INPUT_SINGLE: [u8; 4] = [0x41, 0x4b, 0xf3, 0x89];

/// keccak256("exactInputSingle((address,address,uint24,address,uint256,uint256,uint160))")
pub const V3_02_EXACT_INPUT_SINGLE: [u8; 4] = [0x04, 0xe4, 0x5a, 0xaf];

/// keccak256("exactInput((bytes,address,uint256,uint256,uint256))")
pub const V3_EXACT_INPUT: [u8; 4] = [0xc0, 0x4b, 0x8d, 0x59];

/// keccak256("multicall(bytes[])")
pub const MULTICALL: [u8; 4] = [0xac, 0x96, 0x50, 0xd8];

/// keccak256("multicall(uint256,bytes[])")
pub const MULTICALL_DEADLINE: [u8; 4] = [0x5a, 0xe4, 0x01, 0xdc];

/// `0x`-prefixed lowercase hex of a selector
pub fn to_hex_string(selector: [u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}
