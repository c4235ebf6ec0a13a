//! Universal Router command resolution
//!
//! `execute(commands, inputs, ...)` carries one opcode byte per command and a
//! parallel array of ABI-encoded payloads. Each recognized opcode is mapped
//! to a synthetic selector, the selector is prepended to the payload and the
//! result is decoded like any other call data.

use tracing::debug;

use crate::abi::{CallDecoder, DecodedCall};
use crate::error::{ExtractionError, Result};
use crate::selectors;

/// Bits of a command byte that select the command; the high bits are flags
/// (bit 7 is "allow revert")
pub const COMMAND_TYPE_MASK: u8 = 0x3f;

pub const V3_SWAP_EXACT_IN: u8 = 0x00;
pub const V3_SWAP_EXACT_OUT: u8 = 0x01;
pub const V2_SWAP_EXACT_IN: u8 = 0x08;
pub const V2_SWAP_EXACT_OUT: u8 = 0x09;

/// Opcode → synthetic selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub opcode: u8,
    pub selector: [u8; 4],
    pub name: &'static str,
}

/// Supported commands. Opcodes not listed here are skipped.
pub const COMMAND_TABLE: [CommandEntry; 4] = [
    CommandEntry {
        opcode: V3_SWAP_EXACT_IN,
        selector: selectors::V3_SWAP_EXACT_IN,
        name: "V3_SWAP_EXACT_IN",
    },
    CommandEntry {
        opcode: V3_SWAP_EXACT_OUT,
        selector: selectors::V3_SWAP_EXACT_OUT,
        name: "V3_SWAP_EXACT_OUT",
    },
    CommandEntry {
        opcode: V2_SWAP_EXACT_IN,
        selector: selectors::V2_SWAP_EXACT_IN,
        name: "V2_SWAP_EXACT_IN",
    },
    CommandEntry {
        opcode: V2_SWAP_EXACT_OUT,
        selector: selectors::V2_SWAP_EXACT_OUT,
        name: "V2_SWAP_EXACT_OUT",
    },
];

pub fn lookup(opcode: u8) -> Option<&'static CommandEntry> {
    let command = opcode & COMMAND_TYPE_MASK;
    COMMAND_TABLE.iter().find(|entry| entry.opcode == command)
}

/// Parse a command blob given as hex (`0x` prefix optional)
pub fn parse_command_hex(commands: &str) -> Result<Vec<u8>> {
    let digits = commands.strip_prefix("0x").unwrap_or(commands);
    if digits.len() % 2 != 0 {
        return Err(ExtractionError::MalformedCommandBlob { len: digits.len() });
    }
    hex::decode(digits).map_err(|_| ExtractionError::MalformedCommandBlob { len: digits.len() })
}

/// Splits command bytes into opcodes and decodes the matching payloads
pub struct CommandPayloadResolver<'a> {
    decoder: &'a dyn CallDecoder,
}

impl<'a> CommandPayloadResolver<'a> {
    pub fn new(decoder: &'a dyn CallDecoder) -> Self {
        Self { decoder }
    }

    /// Decode every recognized command, in command order.
    ///
    /// Unrecognized opcodes, missing payloads and payloads the decoder
    /// rejects contribute nothing; the remaining commands are still resolved.
    pub fn resolve(&self, commands: &[u8], inputs: &[Vec<u8>]) -> Vec<DecodedCall> {
        if commands.len() != inputs.len() {
            debug!(
                "Command count {} does not match input count {}",
                commands.len(),
                inputs.len()
            );
        }

        let mut calls = Vec::new();
        for (index, opcode) in commands.iter().enumerate() {
            let Some(entry) = lookup(*opcode) else {
                debug!("Skipping unrecognized command 0x{:02x} at {}", opcode, index);
                continue;
            };

            let Some(payload) = inputs.get(index) else {
                debug!("No input for command {} at {}", entry.name, index);
                continue;
            };

            let mut blob = Vec::with_capacity(4 + payload.len());
            blob.extend_from_slice(&entry.selector);
            blob.extend_from_slice(payload);

            match self.decoder.decode_call(&blob) {
                Ok(call) => calls.push(call),
                Err(e) => debug!("Dropping command {} at {}: {}", entry.name, index, e),
            }
        }
        calls
    }

    /// [`resolve`](Self::resolve) for a hex command blob
    pub fn resolve_hex(&self, commands: &str, inputs: &[Vec<u8>]) -> Result<Vec<DecodedCall>> {
        let commands = parse_command_hex(commands)?;
        Ok(self.resolve(&commands, inputs))
    }
}
