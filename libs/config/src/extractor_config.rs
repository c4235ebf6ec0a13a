//! Swap Extractor Configuration Module
//!
//! Loads the extractor configuration from a TOML file. Every section is
//! optional; missing keys take the values in [`crate::defaults`]. String
//! values may reference environment variables as `${VAR}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::defaults;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/swap_extractor.toml";

/// Main extractor configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExtractorConfig {
    pub extraction: ExtractionSettings,

    /// Routers to register; replaces the default set when present
    pub routers: Vec<RouterConfig>,

    pub etherscan: EtherscanConfig,
    pub rpc: RpcConfig,
    pub output: OutputConfig,
}

/// Extraction core settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExtractionSettings {
    pub max_recursion_depth: usize,
}

/// A router contract to register
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub address: String,

    /// `generic`, `command` or `struct_single_hop` (aliases such as
    /// `uniswap_v2` are resolved by the consumer)
    pub family: String,

    /// Local ABI JSON; takes precedence over the block explorer
    pub abi_file: Option<PathBuf>,
}

/// Block explorer used for ABI retrieval
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EtherscanConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

/// Node endpoints
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RpcConfig {
    pub http_url: Option<String>,
    pub ws_url: Option<String>,
    pub reconnect_delay_ms: u64,
    pub max_in_flight: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_recursion_depth: defaults::extraction::MAX_RECURSION_DEPTH,
        }
    }
}

impl RouterConfig {
    pub fn new(address: &str, family: &str) -> Self {
        Self {
            address: address.to_string(),
            family: family.to_string(),
            abi_file: None,
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionSettings::default(),
            routers: default_routers(),
            etherscan: EtherscanConfig::default(),
            rpc: RpcConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// The Universal Router, two V2 routers and both V3 routers
pub fn default_routers() -> Vec<RouterConfig> {
    use defaults::routers::*;

    let mut routers = vec![RouterConfig::new(UNIVERSAL_ROUTER, COMMAND_FAMILY)];
    routers.extend(
        V2_ROUTERS
            .iter()
            .map(|address| RouterConfig::new(address, GENERIC_FAMILY)),
    );
    routers.extend(
        V3_ROUTERS
            .iter()
            .map(|address| RouterConfig::new(address, STRUCT_SINGLE_HOP_FAMILY)),
    );
    routers
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::etherscan::API_URL.to_string(),
            api_key: Some(defaults::etherscan::API_KEY.to_string()),
            timeout_ms: defaults::etherscan::REQUEST_TIMEOUT_MS,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            http_url: Some(defaults::rpc::HTTP_URL.to_string()),
            ws_url: Some(defaults::rpc::WS_URL.to_string()),
            reconnect_delay_ms: defaults::rpc::RECONNECT_DELAY_MS,
            max_in_flight: defaults::rpc::MAX_IN_FLIGHT,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::output::PATH),
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse configuration {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to deserialize configuration")
    }

    /// Expand `${VAR}` references in endpoint, key and path values.
    ///
    /// An optional value whose variable is unset is cleared so callers can
    /// tell "not configured" apart from a literal placeholder.
    pub fn expand_env_vars(&mut self) {
        self.etherscan.api_key =
            expand_optional(self.etherscan.api_key.take(), "etherscan.api_key");
        self.rpc.http_url = expand_optional(self.rpc.http_url.take(), "rpc.http_url");
        self.rpc.ws_url = expand_optional(self.rpc.ws_url.take(), "rpc.ws_url");

        if let Some(expanded) = expand(&self.etherscan.api_url, "etherscan.api_url") {
            self.etherscan.api_url = expanded;
        }

        if let Some(expanded) = expand_path(&self.output.path, "output.path") {
            self.output.path = expanded;
        }

        for router in &mut self.routers {
            if let Some(abi_file) = &router.abi_file {
                if let Some(expanded) = expand_path(abi_file, "routers.abi_file") {
                    router.abi_file = Some(expanded);
                }
            }
        }
    }
}

fn expand(value: &str, key: &str) -> Option<String> {
    match shellexpand::env(value) {
        Ok(expanded) => Some(expanded.into_owned()),
        Err(e) => {
            warn!("Could not expand {}: {}", key, e);
            None
        }
    }
}

fn expand_optional(value: Option<String>, key: &str) -> Option<String> {
    value.and_then(|value| expand(&value, key)).filter(|value| !value.is_empty())
}

fn expand_path(path: &Path, key: &str) -> Option<PathBuf> {
    path.to_str().and_then(|raw| expand(raw, key)).map(PathBuf::from)
}

/// Load configuration from `path` (or [`DEFAULT_CONFIG_PATH`]), falling back
/// to defaults when the file does not exist
pub fn load_config(path: Option<&Path>) -> Result<ExtractorConfig> {
    let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

    let mut config = if path.exists() {
        info!("Loading configuration from {}", path.display());
        ExtractorConfig::load(path)?
    } else {
        debug!("No configuration at {}, using defaults", path.display());
        ExtractorConfig::default()
    };

    config.expand_env_vars();
    Ok(config)
}
