//! Etherscan ABI retrieval
//!
//! `module=contract&action=getabi` returns the verified ABI of a contract as
//! a JSON string inside the response envelope. Only `status == "1"` with
//! `message == "OK"` counts as success.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use config::EtherscanConfig;

use crate::error::AbiSourceError;

/// Source of router ABI JSON by contract address
#[async_trait]
pub trait AbiFetcher: Send + Sync {
    async fn fetch_abi(&self, address: &str) -> Result<String, AbiSourceError>;
}

#[derive(Debug, Deserialize)]
struct GetAbiResponse {
    status: String,
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// Extract the ABI JSON from a `getabi` response body
pub fn parse_getabi_response(address: &str, body: &str) -> Result<String, AbiSourceError> {
    let unavailable = |reason: String| AbiSourceError::AbiUnavailable {
        address: address.to_string(),
        reason,
    };

    let response: GetAbiResponse = serde_json::from_str(body)
        .map_err(|e| unavailable(format!("malformed explorer response: {}", e)))?;

    if response.status != "1" || response.message != "OK" {
        let detail = response.result.as_str().unwrap_or_default();
        return Err(unavailable(format!(
            "status {} {} {}",
            response.status, response.message, detail
        )));
    }

    match response.result {
        serde_json::Value::String(abi) => Ok(abi),
        other => Err(unavailable(format!("unexpected result type: {}", other))),
    }
}

/// HTTP client for the Etherscan API
pub struct EtherscanClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl EtherscanClient {
    pub fn new(config: &EtherscanConfig) -> Result<Self, AbiSourceError> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl AbiFetcher for EtherscanClient {
    async fn fetch_abi(&self, address: &str) -> Result<String, AbiSourceError> {
        let mut query = vec![
            ("module", "contract"),
            ("action", "getabi"),
            ("address", address),
        ];
        if let Some(api_key) = &self.api_key {
            query.push(("apikey", api_key.as_str()));
        }

        debug!("Requesting ABI for {}", address);
        let body = self
            .client
            .get(&self.api_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_getabi_response(address, &body)
    }
}
