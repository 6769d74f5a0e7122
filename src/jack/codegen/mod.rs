//! Recursive-descent compilation of a Jack class straight to VM
//! instructions. There is no intermediate tree: every `construct` function
//! consumes its grammar rule from the class context's token cursor and
//! returns the code for it.
//!
//! Diagnostics are recorded in the class context and compilation carries
//! on, so one run reports every problem it can find.

use log::debug;

use context::{ClassContext, ProgramContext};

use crate::{
    jack::{error::Error, lexer, symbol_table::Kind, token::Symbol},
    vm,
};

mod class;
pub mod context;
mod expression;
mod literal;
mod statement;
mod subroutine;
mod subroutine_call;
mod variable;

/// Result of compiling one class.
#[derive(Debug)]
pub struct Compilation {
    pub class_name: String,
    pub instructions: Vec<vm::VMInstruction>,
    pub diagnostics: Vec<Error>,
}

impl Compilation {
    /// The generated code, if the class compiled cleanly.
    pub fn into_result(self) -> Result<vm::VMInstructionBlock, Vec<Error>> {
        if self.diagnostics.is_empty() {
            Ok(vm::VMInstructionBlock::from(self.instructions))
        } else {
            Err(self.diagnostics)
        }
    }
}

/// Compile one class from its comment-stripped source lines.
pub fn compile_lines<S: AsRef<str>>(
    lines: &[S],
    program_context: &mut ProgramContext,
) -> Compilation {
    let (tokens, lex_errors) = lexer::tokenize(lines);

    let mut class_context = ClassContext::new(&tokens);
    class_context.diagnostics = lex_errors;

    let instructions = class::construct(&mut class_context, program_context);

    debug!(
        "compiled class {} ({} instructions, {} diagnostics)",
        class_context.class_name,
        instructions.len(),
        class_context.diagnostics.len()
    );

    Compilation {
        class_name: class_context.class_name,
        instructions,
        diagnostics: class_context.diagnostics,
    }
}

/// varName (`,` varName)*
fn define_variables(class_context: &mut ClassContext, r#type: &str, kind: Kind) {
    loop {
        if let Some(name) = class_context.expect_identifier("a variable name") {
            class_context.symbols.define(&name, r#type, kind);
        }

        if !class_context.eat_symbol(Symbol::Comma) {
            break;
        }
    }
}
