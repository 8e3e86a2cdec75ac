//! Tools for reading and writing the on-disk resource format of the SCUMM
//! v5 adventure engine.
//!
//! The format is an XOR-obfuscated, length-prefixed, recursively nested
//! block container: a directory file maps logical resource numbers to
//! (container, offset) pairs, and a data file holds per-room resources,
//! including the bytecode scripts this crate can decode to structured
//! instructions and re-encode byte-exactly.
//!
//! The layering mirrors the format: [`utils`] holds the byte-level reader,
//! writer and XOR plumbing, [`res`] the block container, directory index
//! and room traversal, and [`script`] the instruction codec and the script
//! stream that drives it.

pub mod res;
pub mod script;
pub mod utils;

pub use res::{
    block::{BlockError, BlockHeader, BlockId},
    datafile::{RawBlock, extract_block, parse_data_file_blocks},
    directory::{DirectoryEntry, DirectoryError, DirectoryIndex, parse_directory, write_directory},
};
pub use script::{
    decode::{DecodeError, decode_one},
    encode::encode,
    inst::Instruction,
    stream::{ScriptStream, decode_script, encode_script},
    var::{Param, VarSpec},
};
pub use utils::{block::MemBlock, xor::XorKey};
