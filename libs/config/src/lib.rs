//! # Swap Extractor Configuration
//!
//! Configuration loading and default values for the swap extraction
//! services.
//!
//! ## Features
//!
//! - **Defaults**: known router contracts, explorer and node endpoints
//! - **TOML loading**: optional file with per-section defaults
//! - **Environment expansion**: `${VAR}` references in keys, URLs and paths
//!
//! ## Usage
//!
//! ```rust,no_run
//! use config::load_config;
//!
//! let config = load_config(None)?;
//! println!("{} routers", config.routers.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod defaults;
pub mod extractor_config;

// Re-export commonly used types
pub use extractor_config::{
    default_routers, load_config, EtherscanConfig, ExtractionSettings, ExtractorConfig,
    OutputConfig, RouterConfig, RpcConfig, DEFAULT_CONFIG_PATH,
};
