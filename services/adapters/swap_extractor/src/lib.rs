//! Swap extraction service
//!
//! Collaborators around the `dex` extraction core:
//!
//! - [`abi_source`]: router ABIs from local files, Etherscan or the bundled set
//! - [`rpc_client`]: historical transaction lookup over HTTP JSON-RPC
//! - [`pending_feed`]: `newPendingTransactions` WebSocket subscription
//! - [`watcher`]: pending transaction extraction loop
//! - [`output`]: JSON persistence of swap records

pub mod abi_source;
pub mod error;
pub mod etherscan;
pub mod output;
pub mod pending_feed;
pub mod rpc_client;
pub mod watcher;

pub use abi_source::{AbiOrigin, AbiSource, LoadedRouters};
pub use error::{AbiSourceError, FetchError};
pub use etherscan::{AbiFetcher, EtherscanClient};
pub use output::SwapWriter;
pub use pending_feed::PendingTransactionFeed;
pub use rpc_client::RpcClient;
pub use watcher::Watcher;

use std::sync::Arc;

use dex::SwapExtractor;

/// Extractor over the loaded routers
pub fn build_extractor(loaded: LoadedRouters, max_depth: usize) -> SwapExtractor {
    SwapExtractor::new(Arc::new(loaded.registry), Arc::new(loaded.decoder))
        .with_max_depth(max_depth)
}
