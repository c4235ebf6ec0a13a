//! Router loading tests
//!
//! Exercises ABI source precedence and per-router degradation with a stub
//! explorer, then runs an extraction through the loaded routers.

use std::collections::HashMap;
use std::fs;

use async_trait::async_trait;
use config::RouterConfig;
use dex::{parse_address, RouterFamily, TransactionCallData};
use ethabi::Token;
use ethereum_types::{Address, U256};
use swap_extractor::{build_extractor, AbiFetcher, AbiOrigin, AbiSource, AbiSourceError};
use tempfile::tempdir;

const V2_ROUTER: &str = "0x7a250d5630b4cf539739df2c5dacb4c659f2488d";
const V3_ROUTER: &str = "0xE592427A0AEce92De3Edee1F18E0157C05861564";
const UNIVERSAL_ROUTER: &str = "0x3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad";

const V2_SWAP_ABI: &str = r#"[
    {"type":"function","name":"swapExactTokensForTokens","stateMutability":"nonpayable",
     "inputs":[
        {"name":"amountIn","type":"uint256"},
        {"name":"amountOutMin","type":"uint256"},
        {"name":"path","type":"address[]"},
        {"name":"to","type":"address"},
        {"name":"deadline","type":"uint256"}],
     "outputs":[{"name":"amounts","type":"uint256[]"}]},
    {"type":"event","name":"Sync","inputs":[]}
]"#;

/// Explorer stub answering from a fixed table
struct StubExplorer(HashMap<String, String>);

#[async_trait]
impl AbiFetcher for StubExplorer {
    async fn fetch_abi(&self, address: &str) -> Result<String, AbiSourceError> {
        self.0
            .get(address)
            .cloned()
            .ok_or_else(|| AbiSourceError::AbiUnavailable {
                address: address.to_string(),
                reason: "Contract source code not verified".to_string(),
            })
    }
}

fn explorer_with_v2() -> Box<dyn AbiFetcher> {
    Box::new(StubExplorer(HashMap::from([(
        V2_ROUTER.to_string(),
        V2_SWAP_ABI.to_string(),
    )])))
}

fn v2_call_data(path: &[Address]) -> Vec<u8> {
    // swapExactTokensForTokens(uint256,uint256,address[],address,uint256)
    let mut data = vec![0x38, 0xed, 0x17, 0x39];
    data.extend(ethabi::encode(&[
        Token::Uint(U256::from(1_000u64)),
        Token::Uint(U256::from(900u64)),
        Token::Array(path.iter().map(|t| Token::Address(*t)).collect()),
        Token::Address(Address::from_low_u64_be(0xbeef)),
        Token::Uint(U256::from(1_700_000_000u64)),
    ]));
    data
}

#[tokio::test]
async fn test_explorer_abi_with_bundled_fallback() {
    let routers = vec![
        RouterConfig::new(V2_ROUTER, "uniswap_v2"),
        RouterConfig::new(V3_ROUTER, "uniswap_v3"),
    ];

    let loaded = AbiSource::new(Some(explorer_with_v2()))
        .load_routers(&routers)
        .await;

    assert_eq!(loaded.registry.len(), 2);
    assert!(loaded.skipped.is_empty());
    assert_eq!(loaded.origins[0].1, AbiOrigin::Explorer);
    assert_eq!(loaded.origins[1].1, AbiOrigin::Bundled);
}

#[tokio::test]
async fn test_unavailable_router_is_left_out() {
    let routers = vec![
        RouterConfig::new(V2_ROUTER, "generic"),
        RouterConfig::new(V3_ROUTER, "struct_single_hop"),
    ];

    let loaded = AbiSource::new(Some(explorer_with_v2()))
        .with_bundled_fallback(false)
        .load_routers(&routers)
        .await;

    assert_eq!(loaded.registry.len(), 1);
    assert_eq!(
        loaded.registry.classify_str(V2_ROUTER),
        Some(RouterFamily::Generic)
    );
    assert_eq!(loaded.registry.classify_str(V3_ROUTER), None);
    assert_eq!(loaded.skipped.len(), 1);
    assert!(matches!(
        loaded.skipped[0].1,
        AbiSourceError::AbiUnavailable { .. }
    ));
}

#[tokio::test]
async fn test_invalid_router_entries_are_skipped() {
    let routers = vec![
        RouterConfig::new("0x1234", "generic"),
        RouterConfig::new(V2_ROUTER, "sushiswap_v9"),
        RouterConfig::new(UNIVERSAL_ROUTER, "universal"),
    ];

    let loaded = AbiSource::offline().load_routers(&routers).await;

    assert_eq!(loaded.registry.len(), 1);
    assert_eq!(loaded.skipped.len(), 2);
    assert!(loaded
        .skipped
        .iter()
        .all(|(_, e)| matches!(e, AbiSourceError::InvalidRouter(_))));
}

#[tokio::test]
async fn test_local_abi_file_takes_precedence() {
    let dir = tempdir().unwrap();
    let abi_path = dir.path().join("v2.json");
    fs::write(&abi_path, V2_SWAP_ABI).unwrap();

    let mut router = RouterConfig::new(V2_ROUTER, "generic");
    router.abi_file = Some(abi_path.clone());

    let missing = RouterConfig {
        abi_file: Some(dir.path().join("missing.json")),
        ..RouterConfig::new(V3_ROUTER, "struct_single_hop")
    };

    let loaded = AbiSource::offline()
        .load_routers(&[router, missing])
        .await;

    assert_eq!(
        loaded.origins[0].1,
        AbiOrigin::LocalFile(abi_path.display().to_string())
    );
    assert_eq!(loaded.skipped.len(), 1);
    assert!(matches!(
        loaded.skipped[0].1,
        AbiSourceError::AbiFile { .. }
    ));

    let extractor = build_extractor(loaded, 4);
    let tokens = [Address::from_low_u64_be(1), Address::from_low_u64_be(2)];
    let extraction = extractor
        .extract(&TransactionCallData::new(
            parse_address(V2_ROUTER).unwrap(),
            v2_call_data(&tokens),
        ))
        .unwrap();

    assert_eq!(extraction.path, tokens.to_vec());
    assert_eq!(extraction.deadline, Some(U256::from(1_700_000_000u64)));
}

#[tokio::test]
async fn test_command_functions_registered_for_command_routers() {
    let routers = vec![RouterConfig::new(UNIVERSAL_ROUTER, "command")];
    let loaded = AbiSource::offline().load_routers(&routers).await;

    // V2_SWAP_EXACT_IN synthetic selector
    assert!(loaded.decoder.contains(&[0x3b, 0xd2, 0xd8, 0x79]));
    assert_eq!(loaded.origins[0].1, AbiOrigin::Bundled);
}
