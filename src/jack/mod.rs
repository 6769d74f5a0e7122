//! Jack compiler front end: source lines in, VM instructions out.

pub mod codegen;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod symbol_table;
pub mod token;

pub use codegen::{compile_lines, context::ProgramContext, Compilation};
pub use error::{Error, Span};
