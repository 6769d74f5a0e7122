//! Hack assembly: parsing, two-pass symbol resolution and encoding into
//! 16-bit machine words, plus a CPU model to run the result.

pub mod assembler;
pub mod emulator;
pub mod error;
pub mod instruction;
pub mod parser;
pub mod symbol_table;

pub use assembler::{assemble, assemble_instructions, to_lines};
pub use error::Error;
pub use instruction::{Address, Comp, Dest, Instruction, Jump, Word};
