//! Default configuration values
//!
//! Used when a key is absent from the configuration file, or when no file
//! exists at all.

/// Extraction core defaults
pub mod extraction {
    /// Maximum nesting of call data (multicall payloads, command inputs)
    pub const MAX_RECURSION_DEPTH: usize = 4;
}

/// Known router contracts and their call data families
pub mod routers {
    /// Uniswap Universal Router
    pub const UNIVERSAL_ROUTER: &str = "0x3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad";

    /// Uniswap V2 style routers
    pub const V2_ROUTERS: [&str; 2] = [
        "0xf164fC0Ec4E93095b804a4795bBe1e041497b92a",
        "0x7a250d5630b4cf539739df2c5dacb4c659f2488d",
    ];

    /// Uniswap V3 SwapRouter and SwapRouter02
    pub const V3_ROUTERS: [&str; 2] = [
        "0xE592427A0AEce92De3Edee1F18E0157C05861564",
        "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45",
    ];

    pub const COMMAND_FAMILY: &str = "command";
    pub const GENERIC_FAMILY: &str = "generic";
    pub const STRUCT_SINGLE_HOP_FAMILY: &str = "struct_single_hop";
}

/// Block explorer defaults
pub mod etherscan {
    pub const API_URL: &str = "https://api.etherscan.io/api";

    /// Expanded from the environment at load time
    pub const API_KEY: &str = "${EtherscanKey}";

    /// Request timeout (milliseconds)
    pub const REQUEST_TIMEOUT_MS: u64 = 10_000;
}

/// Node connection defaults
pub mod rpc {
    pub const HTTP_URL: &str = "https://eth-mainnet.g.alchemy.com/v2/${AlchemyKey}";
    pub const WS_URL: &str = "${AlchemyWS}";

    /// Delay before resubscribing after a socket error (milliseconds)
    pub const RECONNECT_DELAY_MS: u64 = 3_000;

    /// Pending transactions processed concurrently by the watcher
    pub const MAX_IN_FLIGHT: usize = 64;
}

/// Output defaults
pub mod output {
    pub const PATH: &str = "swapData.json";
}
