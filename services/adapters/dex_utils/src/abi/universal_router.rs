//! Universal Router ABIs
//!
//! The router itself only exposes `execute`; the swap operations live in the
//! `inputs` payloads and are described here as synthetic functions so the
//! payloads can be decoded with the same machinery as ordinary call data.
//! Their selectors are listed in [`crate::selectors`].

use super::fragment::{AbiParam, FunctionFragment};

pub const EXECUTE: &str = "execute";
pub const V3_SWAP_EXACT_IN: &str = "V3_SWAP_EXACT_IN";
pub const V3_SWAP_EXACT_OUT: &str = "V3_SWAP_EXACT_OUT";
pub const V2_SWAP_EXACT_IN: &str = "V2_SWAP_EXACT_IN";
pub const V2_SWAP_EXACT_OUT: &str = "V2_SWAP_EXACT_OUT";

/// function execute(bytes commands, bytes[] inputs, uint256 deadline)
pub fn execute_with_deadline() -> FunctionFragment {
    FunctionFragment::new(
        EXECUTE,
        vec![
            AbiParam::new("commands", "bytes"),
            AbiParam::new("inputs", "bytes[]"),
            AbiParam::new("deadline", "uint256"),
        ],
    )
}

/// function execute(bytes commands, bytes[] inputs)
pub fn execute() -> FunctionFragment {
    FunctionFragment::new(
        EXECUTE,
        vec![
            AbiParam::new("commands", "bytes"),
            AbiParam::new("inputs", "bytes[]"),
        ],
    )
}

/// (address recipient, uint256 amountIn, uint256 amountOutMin, bytes path, bool payerIsUser)
pub fn v3_swap_exact_in() -> FunctionFragment {
    command(V3_SWAP_EXACT_IN, "amountIn", "amountOutMin", "bytes")
}

/// (address recipient, uint256 amountOut, uint256 amountInMax, bytes path, bool payerIsUser)
pub fn v3_swap_exact_out() -> FunctionFragment {
    command(V3_SWAP_EXACT_OUT, "amountOut", "amountInMax", "bytes")
}

/// (address recipient, uint256 amountIn, uint256 amountOutMin, address[] path, bool payerIsUser)
pub fn v2_swap_exact_in() -> FunctionFragment {
    command(V2_SWAP_EXACT_IN, "amountIn", "amountOutMin", "address[]")
}

/// (address recipient, uint256 amountOut, uint256 amountInMax, address[] path, bool payerIsUser)
pub fn v2_swap_exact_out() -> FunctionFragment {
    command(V2_SWAP_EXACT_OUT, "amountOut", "amountInMax", "address[]")
}

/// Synthetic command functions, in opcode table order
pub fn command_functions() -> Vec<FunctionFragment> {
    vec![
        v3_swap_exact_in(),
        v3_swap_exact_out(),
        v2_swap_exact_in(),
        v2_swap_exact_out(),
    ]
}

/// Router entry points plus the synthetic command functions
pub fn router_functions() -> Vec<FunctionFragment> {
    let mut functions = vec![execute_with_deadline(), execute()];
    functions.extend(command_functions());
    functions
}

fn command(name: &str, amount: &str, limit: &str, path_kind: &str) -> FunctionFragment {
    FunctionFragment::new(
        name,
        vec![
            AbiParam::new("recipient", "address"),
            AbiParam::new(amount, "uint256"),
            AbiParam::new(limit, "uint256"),
            AbiParam::new("path", path_kind),
            AbiParam::new("payerIsUser", "bool"),
        ],
    )
}
