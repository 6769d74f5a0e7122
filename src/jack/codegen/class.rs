use crate::{
    jack::{
        codegen::context::{ClassContext, ProgramContext},
        symbol_table::Kind,
        token::{Keyword, Symbol},
    },
    vm,
};

use super::subroutine;

/// `class` className `{` classVarDec* subroutineDec* `}`
pub fn construct(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    class_context.expect_keyword(Keyword::Class);

    if let Some(class_name) = class_context.expect_identifier("a class name") {
        class_context.class_name = class_name;
    }

    class_context.expect_symbol(Symbol::LeftBrace);

    while class_context.cursor.is_class_var_dec() {
        construct_class_var_dec(class_context);
    }

    let mut instructions = vec![];
    while class_context.cursor.is_subroutine_dec() {
        instructions.extend(subroutine::construct(class_context, program_context));
    }

    class_context.expect_symbol(Symbol::RightBrace);

    if class_context.cursor.has_more_tokens() {
        class_context.report_expected("end of input after the class body");
    }

    instructions
}

/// (`static` | `field`) type varName (`,` varName)* `;`
fn construct_class_var_dec(class_context: &mut ClassContext) {
    let kind = if class_context.eat_keyword(Keyword::Static) {
        Kind::Static
    } else {
        class_context.expect_keyword(Keyword::Field);
        Kind::Field
    };

    let r#type = class_context.expect_type().unwrap_or_default();
    super::define_variables(class_context, &r#type, kind);

    class_context.expect_symbol(Symbol::Semicolon);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jack::codegen::compile_lines;

    #[test]
    fn test_class_variables() {
        let compilation = compile_lines(
            &[
                "class Point {",
                "static int count;",
                "field int x, y;",
                "field Point next;",
                "function int getCount() { return count; }",
                "}",
            ],
            &mut ProgramContext::new(),
        );

        assert!(compilation.diagnostics.is_empty());
        assert_eq!(compilation.class_name, "Point");
        assert_eq!(
            vm::VMInstructionBlock::from(compilation.instructions).compile(),
            ["function Point.getCount 0", "push static 0", "return"].join("\n")
        );
    }

    #[test]
    fn test_trailing_tokens_are_reported() {
        let compilation = compile_lines(&["class A { }", "}"], &mut ProgramContext::new());

        assert_eq!(compilation.diagnostics.len(), 1);
    }
}
