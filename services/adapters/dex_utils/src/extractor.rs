//! Swap parameter extraction
//!
//! Each [`RouterFamily`] has its own [`ExtractionStrategy`] for finding the
//! swap path and deadline inside a decoded call. Batched calls (multicall
//! payloads, Universal Router commands) are decoded and walked recursively;
//! every level of nesting increments a depth counter that is checked against
//! the configured bound before descending.
//!
//! Results of batched calls are flattened in call order without
//! deduplication: sub-calls `[X, Y]` and `[Y, Z]` give `[X, Y, Y, Z]`.

use tracing::debug;

use crate::abi::uniswap_v3::{EXACT_INPUT_SINGLE, EXACT_OUTPUT, EXACT_OUTPUT_SINGLE, MULTICALL};
use crate::abi::universal_router::V3_SWAP_EXACT_OUT;
use crate::abi::{find_parameter, CallDecoder, DecodedCall, Value};
use crate::commands::CommandPayloadResolver;
use crate::error::{ExtractionError, Result};
use crate::path::exact_output_path;
use crate::router_registry::RouterFamily;

/// Which swap parameter to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Path,
    Deadline,
}

impl ValueKind {
    pub fn field_name(self) -> &'static str {
        match self {
            ValueKind::Path => "path",
            ValueKind::Deadline => "deadline",
        }
    }
}

/// Per-family lookup of a [`ValueKind`] in a decoded call.
///
/// `Ok(None)` means the value is not present in this call.
pub trait ExtractionStrategy: Send + Sync {
    fn extract(
        &self,
        extractor: &SwapParameterExtractor<'_>,
        kind: ValueKind,
        call: &DecodedCall,
        depth: usize,
    ) -> Result<Option<Value>>;
}

/// Flat-parameter routers: `path` / `deadline` are top-level arguments
pub struct GenericStrategy;

/// Struct-parameter routers with single-hop swaps and multicall batches
pub struct StructSingleHopStrategy;

/// Command-encoded routers
pub struct CommandStrategy;

static GENERIC: GenericStrategy = GenericStrategy;
static STRUCT_SINGLE_HOP: StructSingleHopStrategy = StructSingleHopStrategy;
static COMMAND: CommandStrategy = CommandStrategy;

impl RouterFamily {
    pub fn strategy(self) -> &'static dyn ExtractionStrategy {
        match self {
            RouterFamily::Generic => &GENERIC,
            RouterFamily::StructSingleHop => &STRUCT_SINGLE_HOP,
            RouterFamily::Command => &COMMAND,
        }
    }

    /// Family whose rules fit a call's own signature, used for calls found
    /// inside a command batch
    pub fn for_call(call: &DecodedCall) -> RouterFamily {
        let name = call.function_name.as_str();
        if is_single_hop(name) || name == MULTICALL || call.sole_struct().is_some() {
            RouterFamily::StructSingleHop
        } else {
            RouterFamily::Generic
        }
    }
}

/// Entry point for extraction; owns the decoder used for nested call data
/// and the recursion bound
pub struct SwapParameterExtractor<'a> {
    decoder: &'a dyn CallDecoder,
    max_depth: usize,
}

impl<'a> SwapParameterExtractor<'a> {
    pub fn new(decoder: &'a dyn CallDecoder, max_depth: usize) -> Self {
        Self { decoder, max_depth }
    }

    pub fn decoder(&self) -> &'a dyn CallDecoder {
        self.decoder
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Extract `kind` from a top-level call
    pub fn extract(
        &self,
        kind: ValueKind,
        call: &DecodedCall,
        family: RouterFamily,
    ) -> Result<Option<Value>> {
        self.extract_nested(kind, call, family, 0)
    }

    /// Extract `kind` from a call found at nesting level `depth`
    pub fn extract_nested(
        &self,
        kind: ValueKind,
        call: &DecodedCall,
        family: RouterFamily,
        depth: usize,
    ) -> Result<Option<Value>> {
        if depth > self.max_depth {
            return Err(ExtractionError::RecursionLimitExceeded {
                depth,
                limit: self.max_depth,
            });
        }
        let value = family.strategy().extract(self, kind, call, depth)?;

        // Reversed before any batch flattening so every hop reads input first
        if kind == ValueKind::Path && is_exact_output_multi_hop(&call.function_name) {
            return Ok(value.map(exact_output_path));
        }
        Ok(value)
    }
}

impl ExtractionStrategy for GenericStrategy {
    fn extract(
        &self,
        _extractor: &SwapParameterExtractor<'_>,
        kind: ValueKind,
        call: &DecodedCall,
        _depth: usize,
    ) -> Result<Option<Value>> {
        let value = match kind {
            ValueKind::Path => call.param("path").or_else(|| call.param("inputs")),
            ValueKind::Deadline => call.param("deadline"),
        };
        Ok(value.cloned())
    }
}

impl ExtractionStrategy for StructSingleHopStrategy {
    fn extract(
        &self,
        extractor: &SwapParameterExtractor<'_>,
        kind: ValueKind,
        call: &DecodedCall,
        depth: usize,
    ) -> Result<Option<Value>> {
        let name = call.function_name.as_str();

        if is_single_hop(name) && kind == ValueKind::Path {
            let Some(fields) = call.sole_struct() else {
                return Ok(None);
            };
            return Ok(
                match (
                    find_parameter(fields, "tokenIn"),
                    find_parameter(fields, "tokenOut"),
                ) {
                    (Some(token_in), Some(token_out)) => {
                        Some(Value::Sequence(vec![token_in.clone(), token_out.clone()]))
                    }
                    _ => None,
                },
            );
        }

        if name == MULTICALL {
            return extract_multicall(extractor, kind, call, depth);
        }

        match call.sole_struct() {
            Some(fields) => Ok(find_parameter(fields, kind.field_name()).cloned()),
            // Flat-parameter swaps exposed by struct routers (SwapRouter02's V2 hops)
            None => GENERIC.extract(extractor, kind, call, depth),
        }
    }
}

impl ExtractionStrategy for CommandStrategy {
    fn extract(
        &self,
        extractor: &SwapParameterExtractor<'_>,
        kind: ValueKind,
        call: &DecodedCall,
        depth: usize,
    ) -> Result<Option<Value>> {
        let (commands, inputs) = command_arguments(call)?;

        let resolver = CommandPayloadResolver::new(extractor.decoder());
        let sub_calls = resolver.resolve(commands, &inputs);
        debug!(
            "Resolved {} of {} commands in {}",
            sub_calls.len(),
            commands.len(),
            call.function_name
        );

        let mut accumulator = Vec::new();
        for sub_call in &sub_calls {
            let family = RouterFamily::for_call(sub_call);
            if let Some(value) = extractor.extract_nested(kind, sub_call, family, depth + 1)? {
                accumulate(&mut accumulator, value);
            }
        }

        Ok(finish_batch(kind, call, accumulator))
    }
}

fn is_single_hop(function_name: &str) -> bool {
    function_name == EXACT_INPUT_SINGLE || function_name == EXACT_OUTPUT_SINGLE
}

fn is_exact_output_multi_hop(function_name: &str) -> bool {
    function_name == EXACT_OUTPUT || function_name == V3_SWAP_EXACT_OUT
}

fn extract_multicall(
    extractor: &SwapParameterExtractor<'_>,
    kind: ValueKind,
    call: &DecodedCall,
    depth: usize,
) -> Result<Option<Value>> {
    let blobs = call
        .param("data")
        .and_then(Value::as_sequence)
        .ok_or_else(|| ExtractionError::ParameterMissing("data".to_string()))?;

    let mut accumulator = Vec::new();
    for (index, blob) in blobs.iter().enumerate() {
        let Some(bytes) = blob.as_bytes() else {
            debug!("Multicall entry {} is not call data", index);
            continue;
        };

        let sub_call = match extractor.decoder().decode_call(bytes) {
            Ok(sub_call) => sub_call,
            Err(e) => {
                debug!("Skipping multicall entry {}: {}", index, e);
                continue;
            }
        };

        if let Some(value) =
            extractor.extract_nested(kind, &sub_call, RouterFamily::StructSingleHop, depth + 1)?
        {
            accumulate(&mut accumulator, value);
        }
    }

    Ok(finish_batch(kind, call, accumulator))
}

/// Sequences are flattened onto the accumulator, scalars appended
fn accumulate(accumulator: &mut Vec<Value>, value: Value) {
    match value {
        Value::Sequence(items) => accumulator.extend(items),
        other => accumulator.push(other),
    }
}

/// Batches may carry one shared deadline on the outer call instead of one
/// per sub-call
fn finish_batch(kind: ValueKind, call: &DecodedCall, accumulator: Vec<Value>) -> Option<Value> {
    if !accumulator.is_empty() {
        return Some(Value::Sequence(accumulator));
    }
    match kind {
        ValueKind::Deadline => call.param("deadline").cloned(),
        ValueKind::Path => None,
    }
}

/// The two leading parameters of a command call: command bytes and payloads
fn command_arguments(call: &DecodedCall) -> Result<(&[u8], Vec<Vec<u8>>)> {
    let commands = call
        .parameters
        .first()
        .and_then(|param| param.value.as_bytes())
        .ok_or_else(|| ExtractionError::ParameterMissing("commands".to_string()))?;

    let inputs = call
        .parameters
        .get(1)
        .and_then(|param| param.value.as_sequence())
        .ok_or_else(|| ExtractionError::ParameterMissing("inputs".to_string()))?
        .iter()
        .map(|input| input.as_bytes().map(<[u8]>::to_vec).unwrap_or_default())
        .collect();

    Ok((commands, inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{AbiError, Parameter};
    use ethereum_types::{Address, U256};

    /// Decoder that maps the first byte of call data to a canned call
    struct TableDecoder(Vec<DecodedCall>);

    impl CallDecoder for TableDecoder {
        fn decode_call(&self, data: &[u8]) -> std::result::Result<DecodedCall, AbiError> {
            data.first()
                .and_then(|index| self.0.get(*index as usize))
                .cloned()
                .ok_or(AbiError::TruncatedInput { len: data.len() })
        }
    }

    fn token(n: u64) -> Value {
        Value::address(Address::from_low_u64_be(n))
    }

    fn single_hop(token_in: u64, token_out: u64) -> DecodedCall {
        DecodedCall::new(
            EXACT_INPUT_SINGLE,
            vec![Parameter::new(
                "params",
                Value::Struct(vec![
                    Parameter::new("tokenIn", token(token_in)),
                    Parameter::new("tokenOut", token(token_out)),
                    Parameter::new("deadline", Value::uint(U256::from(100u64))),
                ]),
            )],
        )
    }

    fn multicall(entries: &[u8]) -> DecodedCall {
        DecodedCall::new(
            MULTICALL,
            vec![Parameter::new(
                "data",
                Value::Sequence(entries.iter().map(|e| Value::bytes(vec![*e])).collect()),
            )],
        )
    }

    #[test]
    fn test_generic_falls_back_to_inputs() {
        let decoder = TableDecoder(vec![]);
        let extractor = SwapParameterExtractor::new(&decoder, 4);
        let call = DecodedCall::new(
            "swap",
            vec![Parameter::new("inputs", Value::Sequence(vec![token(1)]))],
        );

        assert_eq!(
            extractor
                .extract(ValueKind::Path, &call, RouterFamily::Generic)
                .unwrap(),
            Some(Value::Sequence(vec![token(1)]))
        );
        assert_eq!(
            extractor
                .extract(ValueKind::Deadline, &call, RouterFamily::Generic)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_struct_field_lookup() {
        let decoder = TableDecoder(vec![]);
        let extractor = SwapParameterExtractor::new(&decoder, 4);

        let deadline = extractor
            .extract(
                ValueKind::Deadline,
                &single_hop(1, 2),
                RouterFamily::StructSingleHop,
            )
            .unwrap();
        assert_eq!(deadline, Some(Value::uint(U256::from(100u64))));
    }

    #[test]
    fn test_multicall_skips_undecodable_entries() {
        let decoder = TableDecoder(vec![single_hop(1, 2), single_hop(2, 3)]);
        let extractor = SwapParameterExtractor::new(&decoder, 4);

        // Entry 9 has no canned call and is dropped
        let path = extractor
            .extract(
                ValueKind::Path,
                &multicall(&[0, 9, 1]),
                RouterFamily::StructSingleHop,
            )
            .unwrap();
        assert_eq!(
            path,
            Some(Value::Sequence(vec![token(1), token(2), token(2), token(3)]))
        );
    }

    #[test]
    fn test_multicall_deadline_falls_back_to_outer_call() {
        let decoder = TableDecoder(vec![DecodedCall::new("unwrapWETH9", vec![])]);
        let extractor = SwapParameterExtractor::new(&decoder, 4);

        let mut call = multicall(&[0]);
        call.parameters.insert(
            0,
            Parameter::new("deadline", Value::uint(U256::from(42u64))),
        );

        assert_eq!(
            extractor
                .extract(ValueKind::Deadline, &call, RouterFamily::StructSingleHop)
                .unwrap(),
            Some(Value::uint(U256::from(42u64)))
        );
        assert_eq!(
            extractor
                .extract(ValueKind::Path, &call, RouterFamily::StructSingleHop)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_nested_multicall_hits_recursion_limit() {
        // Entry 0 decodes to a multicall of entry 0, forever
        let decoder = TableDecoder(vec![multicall(&[0])]);
        let extractor = SwapParameterExtractor::new(&decoder, 3);

        let result = extractor.extract(
            ValueKind::Path,
            &multicall(&[0]),
            RouterFamily::StructSingleHop,
        );
        assert_eq!(
            result,
            Err(ExtractionError::RecursionLimitExceeded { depth: 4, limit: 3 })
        );
    }

    #[test]
    fn test_command_call_requires_leading_arguments() {
        let decoder = TableDecoder(vec![]);
        let extractor = SwapParameterExtractor::new(&decoder, 4);
        let call = DecodedCall::new("execute", vec![]);

        assert_eq!(
            extractor.extract(ValueKind::Path, &call, RouterFamily::Command),
            Err(ExtractionError::ParameterMissing("commands".to_string()))
        );
    }

    #[test]
    fn test_exact_output_paths_read_input_first() {
        let packed = crate::path::encode_packed_path(
            &[Address::from_low_u64_be(3), Address::from_low_u64_be(1)],
            &[3000],
        );
        let exact_output = DecodedCall::new(
            EXACT_OUTPUT,
            vec![Parameter::new(
                "params",
                Value::Struct(vec![Parameter::new("path", Value::bytes(packed.clone()))]),
            )],
        );
        let command_hop = DecodedCall::new(
            V3_SWAP_EXACT_OUT,
            vec![Parameter::new("path", Value::bytes(packed))],
        );
        let decoder = TableDecoder(vec![exact_output.clone()]);
        let extractor = SwapParameterExtractor::new(&decoder, 4);
        let expected = Some(Value::Sequence(vec![token(1), token(3)]));

        assert_eq!(
            extractor
                .extract(ValueKind::Path, &exact_output, RouterFamily::StructSingleHop)
                .unwrap(),
            expected
        );
        assert_eq!(
            extractor
                .extract(ValueKind::Path, &command_hop, RouterFamily::Generic)
                .unwrap(),
            expected
        );
        // Inside a multicall the hop is reoriented before flattening
        assert_eq!(
            extractor
                .extract(ValueKind::Path, &multicall(&[0]), RouterFamily::StructSingleHop)
                .unwrap(),
            expected
        );
    }

    #[test]
    fn test_family_for_call() {
        assert_eq!(
            RouterFamily::for_call(&single_hop(1, 2)),
            RouterFamily::StructSingleHop
        );
        assert_eq!(
            RouterFamily::for_call(&DecodedCall::new("V2_SWAP_EXACT_IN", vec![])),
            RouterFamily::Generic
        );
    }
}
