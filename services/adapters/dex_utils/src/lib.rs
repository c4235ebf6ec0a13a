//! Router call data decoding and swap parameter extraction
//!
//! Given a transaction's destination and call data, identifies which DEX
//! router convention the destination uses and recovers the swap path and
//! deadline, descending into multicall batches and Universal Router command
//! payloads.
//!
//! # Architecture
//!
//! ```text
//! dex/
//! ├── abi/               # Fragments, decoded call tree, bundled router ABIs
//! ├── router_registry.rs # Address → RouterFamily
//! ├── commands.rs        # Universal Router opcode table and resolver
//! ├── extractor.rs       # Per-family extraction strategies
//! ├── extraction.rs      # Orchestrator and SwapExtraction record
//! └── path.rs            # V3 packed path handling
//! ```
//!
//! # Design Principles
//! - Registry and decoder are built once and shared read-only
//! - No I/O; one transaction is one synchronous unit of work
//! - Nested call data is walked with an explicit depth bound

pub mod abi;
pub mod commands;
pub mod error;
pub mod extraction;
pub mod extractor;
pub mod path;
pub mod router_registry;
pub mod selectors;

pub use abi::{bundled_decoder, AbiDecoder, AbiError, CallDecoder, DecodedCall, Value};
pub use commands::{CommandEntry, CommandPayloadResolver, COMMAND_TABLE};
pub use error::{ExtractionError, Result};
pub use extraction::{
    ExtractionIssue, SwapExtraction, SwapExtractor, TransactionCallData, DEFAULT_MAX_DEPTH,
};
pub use extractor::{ExtractionStrategy, SwapParameterExtractor, ValueKind};
pub use router_registry::{
    format_address, parse_address, RouterDescriptor, RouterFamily, RouterRegistry,
};
