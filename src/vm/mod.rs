//! The Hack VM: the instruction vocabulary shared with the Jack compiler,
//! and the translator that lowers VM code to Hack assembly.

pub mod code_writer;
pub mod error;
pub mod instruction;
pub mod parser;
pub mod translator;

pub use error::Error;
pub use instruction::{
    call, command, function, label, pop, push, r#false, r#true, vm_return, LabelAction, Segment,
    VMCommand, VMInstruction, VMInstructionBlock,
};
pub use translator::{translate, Translator, TranslatorOptions};
