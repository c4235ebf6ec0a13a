//! Swap path normalization
//!
//! Extracted path values come in two shapes: a sequence of addresses
//! (V2-style `address[] path`, or the `[tokenIn, tokenOut]` pair of a
//! single-hop call) and V3 packed paths, `token | fee | token | fee | token`
//! with 20-byte tokens and 3-byte fees.

use ethereum_types::Address;

use crate::abi::{Scalar, Value};

const ADDRESS_BYTES: usize = 20;
const FEE_BYTES: usize = 3;
const HOP_BYTES: usize = ADDRESS_BYTES + FEE_BYTES;

/// Tokens and pool fees of a V3 packed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPath {
    pub tokens: Vec<Address>,
    pub fees: Vec<u32>,
}

/// Decode a V3 packed path; `None` if the length is not `20 + 23 * n`
pub fn parse_packed_path(path: &[u8]) -> Option<PackedPath> {
    if path.len() < ADDRESS_BYTES || (path.len() - ADDRESS_BYTES) % HOP_BYTES != 0 {
        return None;
    }

    let mut tokens = vec![Address::from_slice(&path[..ADDRESS_BYTES])];
    let mut fees = Vec::new();

    for hop in path[ADDRESS_BYTES..].chunks_exact(HOP_BYTES) {
        let fee = hop[..FEE_BYTES]
            .iter()
            .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte));
        fees.push(fee);
        tokens.push(Address::from_slice(&hop[FEE_BYTES..]));
    }

    Some(PackedPath { tokens, fees })
}

/// Flatten an extracted path value into token addresses, in order.
///
/// Packed byte paths are expanded in place; anything that is neither an
/// address nor a packed path is ignored.
pub fn path_addresses(value: &Value) -> Vec<Address> {
    let mut tokens = Vec::new();
    collect_addresses(value, &mut tokens);
    tokens
}

fn collect_addresses(value: &Value, tokens: &mut Vec<Address>) {
    match value {
        Value::Scalar(Scalar::Address(address)) => tokens.push(*address),
        Value::Scalar(Scalar::Bytes(bytes)) => {
            if let Some(packed) = parse_packed_path(bytes) {
                tokens.extend(packed.tokens);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                collect_addresses(item, tokens);
            }
        }
        Value::Scalar(_) | Value::Struct(_) => {}
    }
}

/// Packed path of an exact-output swap, which V3 stores output token first,
/// as a sequence of addresses in swap order. Other values pass through.
pub fn exact_output_path(value: Value) -> Value {
    match value {
        Value::Scalar(Scalar::Bytes(ref bytes)) => match parse_packed_path(bytes) {
            Some(packed) => Value::Sequence(
                packed.tokens.into_iter().rev().map(Value::address).collect(),
            ),
            None => value,
        },
        other => other,
    }
}

/// Encode tokens and fees as a V3 packed path
pub fn encode_packed_path(tokens: &[Address], fees: &[u32]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(ADDRESS_BYTES + fees.len() * HOP_BYTES);
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 {
            if let Some(fee) = fees.get(index - 1) {
                packed.extend_from_slice(&fee.to_be_bytes()[1..]);
            }
        }
        packed.extend_from_slice(token.as_bytes());
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn test_parse_two_hop_packed_path() {
        let packed = encode_packed_path(&[token(1), token(2), token(3)], &[500, 3000]);
        assert_eq!(packed.len(), 20 + 2 * 23);

        let parsed = parse_packed_path(&packed).unwrap();
        assert_eq!(parsed.tokens, vec![token(1), token(2), token(3)]);
        assert_eq!(parsed.fees, vec![500, 3000]);
    }

    #[test]
    fn test_parse_rejects_misaligned_length() {
        assert!(parse_packed_path(&[0u8; 19]).is_none());
        assert!(parse_packed_path(&[0u8; 42]).is_none());
        assert_eq!(parse_packed_path(&[0u8; 20]).unwrap().tokens.len(), 1);
    }

    #[test]
    fn test_path_addresses_mixes_shapes() {
        let value = Value::Sequence(vec![
            Value::address(token(1)),
            Value::bytes(encode_packed_path(&[token(2), token(3)], &[100])),
            Value::uint(5u64.into()),
        ]);
        assert_eq!(path_addresses(&value), vec![token(1), token(2), token(3)]);
    }

    #[test]
    fn test_exact_output_path_is_reversed() {
        let packed = encode_packed_path(&[token(3), token(2), token(1)], &[500, 3000]);
        let ordered = exact_output_path(Value::bytes(packed));
        assert_eq!(path_addresses(&ordered), vec![token(1), token(2), token(3)]);

        // Misaligned bytes and address sequences are left alone
        let odd = Value::bytes(vec![0u8; 21]);
        assert_eq!(exact_output_path(odd.clone()), odd);
        let pair = Value::Sequence(vec![Value::address(token(1)), Value::address(token(2))]);
        assert_eq!(exact_output_path(pair.clone()), pair);
    }
}
