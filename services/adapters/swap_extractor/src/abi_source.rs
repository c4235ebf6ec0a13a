//! Router ABI loading
//!
//! Builds the router registry and the shared decoder from the configured
//! routers. Each router's ABI comes from, in order:
//!
//! 1. its local `abi_file`, when configured
//! 2. the block explorer, when a fetcher is available
//! 3. the bundled ABI for its family, when bundled fallback is enabled
//!
//! A router whose ABI cannot be obtained is logged and left out of the
//! registry; the remaining routers are still usable.

use std::path::Path;

use dex::abi::{bundled_functions, universal_router};
use dex::{AbiDecoder, RouterDescriptor, RouterFamily, RouterRegistry};
use tracing::{debug, info, warn};

use config::RouterConfig;

use crate::error::AbiSourceError;
use crate::etherscan::AbiFetcher;

/// Where a router's ABI was taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiOrigin {
    LocalFile(String),
    Explorer,
    Bundled,
}

/// Routers that could not be registered, with the reason
pub type SkippedRouter = (String, AbiSourceError);

/// Registry and decoder ready for extraction
pub struct LoadedRouters {
    pub registry: RouterRegistry,
    pub decoder: AbiDecoder,
    pub origins: Vec<(RouterDescriptor, AbiOrigin)>,
    pub skipped: Vec<SkippedRouter>,
}

pub struct AbiSource {
    fetcher: Option<Box<dyn AbiFetcher>>,
    bundled_fallback: bool,
}

impl AbiSource {
    pub fn new(fetcher: Option<Box<dyn AbiFetcher>>) -> Self {
        Self {
            fetcher,
            bundled_fallback: true,
        }
    }

    /// Bundled ABIs only; no network access
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn with_bundled_fallback(mut self, enabled: bool) -> Self {
        self.bundled_fallback = enabled;
        self
    }

    /// Load every configured router
    pub async fn load_routers(&self, routers: &[RouterConfig]) -> LoadedRouters {
        let mut decoder = AbiDecoder::new();
        let mut origins = Vec::new();
        let mut skipped = Vec::new();

        for router in routers {
            match self.load_router(router, &mut decoder).await {
                Ok((descriptor, origin)) => {
                    debug!(
                        "Registered {} router {} ({:?})",
                        descriptor.family, router.address, origin
                    );
                    origins.push((descriptor, origin));
                }
                Err(e) => {
                    warn!("Router {} left out: {}", router.address, e);
                    skipped.push((router.address.clone(), e));
                }
            }
        }

        // Command payloads decode against synthetic functions no explorer ABI has
        if origins
            .iter()
            .any(|(descriptor, _)| descriptor.family == RouterFamily::Command)
        {
            for fragment in universal_router::command_functions() {
                if let Err(e) = decoder.add_fragment(fragment) {
                    warn!("Failed to register command function: {}", e);
                }
            }
        }

        let registry = RouterRegistry::new(origins.iter().map(|(descriptor, _)| *descriptor));
        info!(
            "Loaded {} routers ({} skipped), {} functions",
            registry.len(),
            skipped.len(),
            decoder.len()
        );

        LoadedRouters {
            registry,
            decoder,
            origins,
            skipped,
        }
    }

    async fn load_router(
        &self,
        router: &RouterConfig,
        decoder: &mut AbiDecoder,
    ) -> Result<(RouterDescriptor, AbiOrigin), AbiSourceError> {
        let family: RouterFamily = router.family.parse()?;
        let descriptor = RouterDescriptor::parse(&router.address, family)?;

        if let Some(path) = &router.abi_file {
            let abi = read_abi_file(path)?;
            add_abi(decoder, &router.address, &abi)?;
            return Ok((descriptor, AbiOrigin::LocalFile(path.display().to_string())));
        }

        if let Some(fetcher) = &self.fetcher {
            let fetched = match fetcher.fetch_abi(&router.address).await {
                Ok(abi) => add_abi(decoder, &router.address, &abi),
                Err(e) => Err(e),
            };

            match fetched {
                Ok(()) => return Ok((descriptor, AbiOrigin::Explorer)),
                Err(e) if self.bundled_fallback => {
                    warn!(
                        "Explorer ABI for {} unusable ({}), using bundled ABI",
                        router.address, e
                    );
                }
                Err(e) => return Err(e),
            }
        } else if !self.bundled_fallback {
            return Err(AbiSourceError::AbiUnavailable {
                address: router.address.clone(),
                reason: "no ABI file or explorer configured".to_string(),
            });
        }

        for fragment in bundled_functions(family) {
            decoder.add_fragment(fragment)?;
        }
        Ok((descriptor, AbiOrigin::Bundled))
    }
}

fn read_abi_file(path: &Path) -> Result<String, AbiSourceError> {
    std::fs::read_to_string(path).map_err(|e| AbiSourceError::AbiFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn add_abi(decoder: &mut AbiDecoder, address: &str, abi: &str) -> Result<(), AbiSourceError> {
    let added = decoder.add_abi_json(abi)?;
    if added == 0 {
        return Err(AbiSourceError::AbiUnavailable {
            address: address.to_string(),
            reason: "ABI has no usable functions".to_string(),
        });
    }
    debug!("Added {} functions for {}", added, address);
    Ok(())
}
