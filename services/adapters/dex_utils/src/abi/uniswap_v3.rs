//! Uniswap V3 router ABIs
//!
//! Struct-parameter swap functions of SwapRouter (which carry a `deadline`
//! field inside the struct) and SwapRouter02 (which moved the deadline to
//! `multicall(uint256 deadline, bytes[] data)`), plus the multicall variants
//! used to batch them.

use super::fragment::{AbiParam, FunctionFragment};

pub const EXACT_INPUT_SINGLE: &str = "exactInputSingle";
pub const EXACT_OUTPUT_SINGLE: &str = "exactOutputSingle";
pub const EXACT_INPUT: &str = "exactInput";
pub const EXACT_OUTPUT: &str = "exactOutput";
pub const MULTICALL: &str = "multicall";

/// function exactInputSingle(ExactInputSingleParams params)
/// struct ExactInputSingleParams { address tokenIn; address tokenOut; uint24 fee; address recipient; uint256 deadline; uint256 amountIn; uint256 amountOutMinimum; uint160 sqrtPriceLimitX96; }
pub fn exact_input_single() -> FunctionFragment {
    single_hop(EXACT_INPUT_SINGLE, "amountIn", "amountOutMinimum", true)
}

/// function exactOutputSingle(ExactOutputSingleParams params)
/// struct ExactOutputSingleParams { address tokenIn; address tokenOut; uint24 fee; address recipient; uint256 deadline; uint256 amountOut; uint256 amountInMaximum; uint160 sqrtPriceLimitX96; }
pub fn exact_output_single() -> FunctionFragment {
    single_hop(EXACT_OUTPUT_SINGLE, "amountOut", "amountInMaximum", true)
}

/// function exactInput(ExactInputParams params)
/// struct ExactInputParams { bytes path; address recipient; uint256 deadline; uint256 amountIn; uint256 amountOutMinimum; }
pub fn exact_input() -> FunctionFragment {
    multi_hop(EXACT_INPUT, "amountIn", "amountOutMinimum", true)
}

/// function exactOutput(ExactOutputParams params)
/// struct ExactOutputParams { bytes path; address recipient; uint256 deadline; uint256 amountOut; uint256 amountInMaximum; }
pub fn exact_output() -> FunctionFragment {
    multi_hop(EXACT_OUTPUT, "amountOut", "amountInMaximum", true)
}

/// function multicall(bytes[] data)
pub fn multicall() -> FunctionFragment {
    FunctionFragment::new(MULTICALL, vec![AbiParam::new("data", "bytes[]")])
}

/// function multicall(uint256 deadline, bytes[] data)
pub fn multicall_with_deadline() -> FunctionFragment {
    FunctionFragment::new(
        MULTICALL,
        vec![
            AbiParam::new("deadline", "uint256"),
            AbiParam::new("data", "bytes[]"),
        ],
    )
}

/// function multicall(bytes32 previousBlockhash, bytes[] data)
pub fn multicall_with_blockhash() -> FunctionFragment {
    FunctionFragment::new(
        MULTICALL,
        vec![
            AbiParam::new("previousBlockhash", "bytes32"),
            AbiParam::new("data", "bytes[]"),
        ],
    )
}

/// SwapRouter (0xE592427A0AEce92De3Edee1F18E0157C05861564)
pub fn swap_router_functions() -> Vec<FunctionFragment> {
    vec![
        exact_input_single(),
        exact_output_single(),
        exact_input(),
        exact_output(),
        multicall(),
    ]
}

/// SwapRouter02 (0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45)
pub fn swap_router02_functions() -> Vec<FunctionFragment> {
    vec![
        single_hop(EXACT_INPUT_SINGLE, "amountIn", "amountOutMinimum", false),
        single_hop(EXACT_OUTPUT_SINGLE, "amountOut", "amountInMaximum", false),
        multi_hop(EXACT_INPUT, "amountIn", "amountOutMinimum", false),
        multi_hop(EXACT_OUTPUT, "amountOut", "amountInMaximum", false),
        // V2 hops routed through SwapRouter02 keep a flat path
        FunctionFragment::new(
            "swapExactTokensForTokens",
            vec![
                AbiParam::new("amountIn", "uint256"),
                AbiParam::new("amountOutMin", "uint256"),
                AbiParam::new("path", "address[]"),
                AbiParam::new("to", "address"),
            ],
        ),
        FunctionFragment::new(
            "swapTokensForExactTokens",
            vec![
                AbiParam::new("amountOut", "uint256"),
                AbiParam::new("amountInMax", "uint256"),
                AbiParam::new("path", "address[]"),
                AbiParam::new("to", "address"),
            ],
        ),
        multicall(),
        multicall_with_deadline(),
        multicall_with_blockhash(),
    ]
}

fn single_hop(name: &str, amount: &str, limit: &str, with_deadline: bool) -> FunctionFragment {
    let mut fields = vec![
        AbiParam::new("tokenIn", "address"),
        AbiParam::new("tokenOut", "address"),
        AbiParam::new("fee", "uint24"),
        AbiParam::new("recipient", "address"),
    ];
    if with_deadline {
        fields.push(AbiParam::new("deadline", "uint256"));
    }
    fields.extend([
        AbiParam::new(amount, "uint256"),
        AbiParam::new(limit, "uint256"),
        AbiParam::new("sqrtPriceLimitX96", "uint160"),
    ]);

    FunctionFragment::new(name, vec![AbiParam::tuple("params", "tuple", fields)])
}

fn multi_hop(name: &str, amount: &str, limit: &str, with_deadline: bool) -> FunctionFragment {
    let mut fields = vec![
        AbiParam::new("path", "bytes"),
        AbiParam::new("recipient", "address"),
    ];
    if with_deadline {
        fields.push(AbiParam::new("deadline", "uint256"));
    }
    fields.extend([
        AbiParam::new(amount, "uint256"),
        AbiParam::new(limit, "uint256"),
    ]);

    FunctionFragment::new(name, vec![AbiParam::tuple("params", "tuple", fields)])
}
