//! Performance benchmarks for swap extraction
//!
//! Covers the hot path of the pending-transaction watcher: router lookup,
//! call data decoding and full extraction for each router family.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dex::abi::{uniswap_v2, uniswap_v3, universal_router, FunctionFragment};
use dex::path::encode_packed_path;
use dex::*;
use ethabi::Token;
use ethereum_types::{Address, U256};

const V2_ROUTER: &str = "0x7a250d5630b4cf539739df2c5dacb4c659f2488d";
const SWAP_ROUTER: &str = "0xe592427a0aece92de3edee1f18e0157c05861564";
const UNIVERSAL_ROUTER: &str = "0x3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad";

fn token(n: u64) -> Address {
    Address::from_low_u64_be(0x1000 + n)
}

fn call_data(fragment: FunctionFragment, tokens: &[Token]) -> Vec<u8> {
    let mut data = fragment.selector().unwrap().to_vec();
    data.extend(ethabi::encode(tokens));
    data
}

fn v2_swap() -> Vec<u8> {
    call_data(
        uniswap_v2::swap_exact_tokens_for_tokens(),
        &[
            Token::Uint(U256::from(1_000_000u64)),
            Token::Uint(U256::from(990_000u64)),
            Token::Array(vec![Token::Address(token(1)), Token::Address(token(2))]),
            Token::Address(Address::from_low_u64_be(0xbeef)),
            Token::Uint(U256::from(1_700_000_000u64)),
        ],
    )
}

fn single_hop(token_in: Address, token_out: Address) -> Vec<u8> {
    call_data(
        uniswap_v3::exact_input_single(),
        &[Token::Tuple(vec![
            Token::Address(token_in),
            Token::Address(token_out),
            Token::Uint(U256::from(3000u64)),
            Token::Address(Address::from_low_u64_be(0xbeef)),
            Token::Uint(U256::from(1_700_000_000u64)),
            Token::Uint(U256::from(1_000u64)),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
        ])],
    )
}

fn multicall() -> Vec<u8> {
    call_data(
        uniswap_v3::multicall(),
        &[Token::Array(vec![
            Token::Bytes(single_hop(token(1), token(2))),
            Token::Bytes(single_hop(token(2), token(3))),
        ])],
    )
}

fn universal_execute() -> Vec<u8> {
    let v3_payload = ethabi::encode(&[
        Token::Address(Address::from_low_u64_be(0xbeef)),
        Token::Uint(U256::from(1_000u64)),
        Token::Uint(U256::from(900u64)),
        Token::Bytes(encode_packed_path(&[token(1), token(2), token(3)], &[500, 3000])),
        Token::Bool(true),
    ]);
    call_data(
        universal_router::execute_with_deadline(),
        &[
            Token::Bytes(vec![0x0b, 0x00]),
            Token::Array(vec![Token::Bytes(vec![0u8; 64]), Token::Bytes(v3_payload)]),
            Token::Uint(U256::from(1_700_000_000u64)),
        ],
    )
}

fn extractor() -> SwapExtractor {
    let registry = RouterRegistry::new([
        RouterDescriptor::parse(V2_ROUTER, RouterFamily::Generic).unwrap(),
        RouterDescriptor::parse(SWAP_ROUTER, RouterFamily::StructSingleHop).unwrap(),
        RouterDescriptor::parse(UNIVERSAL_ROUTER, RouterFamily::Command).unwrap(),
    ]);
    SwapExtractor::new(Arc::new(registry), Arc::new(bundled_decoder().unwrap()))
}

fn bench_router_lookup(c: &mut Criterion) {
    let extractor = extractor();
    let known = parse_address(UNIVERSAL_ROUTER).unwrap();
    let unknown = Address::from_low_u64_be(0xdead);

    c.bench_function("router_lookup_known", |b| {
        b.iter(|| black_box(extractor.registry().classify(&known)))
    });

    c.bench_function("router_lookup_unknown", |b| {
        b.iter(|| black_box(extractor.registry().classify(&unknown)))
    });
}

fn bench_decoding(c: &mut Criterion) {
    let decoder = bundled_decoder().unwrap();
    let v2 = v2_swap();
    let multicall = multicall();

    c.bench_function("decode_v2_swap", |b| {
        b.iter(|| black_box(decoder.decode_call(&v2)))
    });

    c.bench_function("decode_multicall", |b| {
        b.iter(|| black_box(decoder.decode_call(&multicall)))
    });
}

fn bench_extraction(c: &mut Criterion) {
    let extractor = extractor();
    let router = |address: &str, data: Vec<u8>| {
        TransactionCallData::new(parse_address(address).unwrap(), data)
    };

    let v2 = router(V2_ROUTER, v2_swap());
    let multicall = router(SWAP_ROUTER, multicall());
    let universal = router(UNIVERSAL_ROUTER, universal_execute());

    c.bench_function("extract_generic", |b| {
        b.iter(|| black_box(extractor.extract(&v2)))
    });

    c.bench_function("extract_multicall", |b| {
        b.iter(|| black_box(extractor.extract(&multicall)))
    });

    c.bench_function("extract_universal_router", |b| {
        b.iter(|| black_box(extractor.extract(&universal)))
    });
}

criterion_group!(benches, bench_router_lookup, bench_decoding, bench_extraction);
criterion_main!(benches);
