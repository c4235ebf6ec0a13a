//! Uniswap V2 router and compatible protocol ABIs
//!
//! Swap functions of UniswapV2Router02 and its forks. Every one of them takes
//! a flat `address[] path` and a `uint256 deadline`.

use super::fragment::{AbiParam, FunctionFragment};

/// function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline)
pub fn swap_exact_tokens_for_tokens() -> FunctionFragment {
    exact_in("swapExactTokensForTokens")
}

/// function swapTokensForExactTokens(uint256 amountOut, uint256 amountInMax, address[] path, address to, uint256 deadline)
pub fn swap_tokens_for_exact_tokens() -> FunctionFragment {
    exact_out("swapTokensForExactTokens")
}

/// function swapExactETHForTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline)
pub fn swap_exact_eth_for_tokens() -> FunctionFragment {
    eth_in("swapExactETHForTokens", "amountOutMin")
}

/// function swapTokensForExactETH(uint256 amountOut, uint256 amountInMax, address[] path, address to, uint256 deadline)
pub fn swap_tokens_for_exact_eth() -> FunctionFragment {
    exact_out("swapTokensForExactETH")
}

/// function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline)
pub fn swap_exact_tokens_for_eth() -> FunctionFragment {
    exact_in("swapExactTokensForETH")
}

/// function swapETHForExactTokens(uint256 amountOut, address[] path, address to, uint256 deadline)
pub fn swap_eth_for_exact_tokens() -> FunctionFragment {
    eth_in("swapETHForExactTokens", "amountOut")
}

pub fn swap_exact_tokens_for_tokens_supporting_fee() -> FunctionFragment {
    exact_in("swapExactTokensForTokensSupportingFeeOnTransferTokens")
}

pub fn swap_exact_eth_for_tokens_supporting_fee() -> FunctionFragment {
    eth_in(
        "swapExactETHForTokensSupportingFeeOnTransferTokens",
        "amountOutMin",
    )
}

pub fn swap_exact_tokens_for_eth_supporting_fee() -> FunctionFragment {
    exact_in("swapExactTokensForETHSupportingFeeOnTransferTokens")
}

/// All bundled V2 router swap functions
pub fn router_functions() -> Vec<FunctionFragment> {
    vec![
        swap_exact_tokens_for_tokens(),
        swap_tokens_for_exact_tokens(),
        swap_exact_eth_for_tokens(),
        swap_tokens_for_exact_eth(),
        swap_exact_tokens_for_eth(),
        swap_eth_for_exact_tokens(),
        swap_exact_tokens_for_tokens_supporting_fee(),
        swap_exact_eth_for_tokens_supporting_fee(),
        swap_exact_tokens_for_eth_supporting_fee(),
    ]
}

fn exact_in(name: &str) -> FunctionFragment {
    FunctionFragment::new(
        name,
        vec![
            AbiParam::new("amountIn", "uint256"),
            AbiParam::new("amountOutMin", "uint256"),
            AbiParam::new("path", "address[]"),
            AbiParam::new("to", "address"),
            AbiParam::new("deadline", "uint256"),
        ],
    )
}

fn exact_out(name: &str) -> FunctionFragment {
    FunctionFragment::new(
        name,
        vec![
            AbiParam::new("amountOut", "uint256"),
            AbiParam::new("amountInMax", "uint256"),
            AbiParam::new("path", "address[]"),
            AbiParam::new("to", "address"),
            AbiParam::new("deadline", "uint256"),
        ],
    )
}

fn eth_in(name: &str, amount: &str) -> FunctionFragment {
    FunctionFragment::new(
        name,
        vec![
            AbiParam::new(amount, "uint256"),
            AbiParam::new("path", "address[]"),
            AbiParam::new("to", "address"),
            AbiParam::new("deadline", "uint256"),
        ],
    )
}
