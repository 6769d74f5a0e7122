use log::debug;

use crate::{
    jack::{
        codegen::context::{ClassContext, ProgramContext},
        symbol_table::Kind,
        token::{Keyword, Symbol},
    },
    vm,
};

use super::statement;

/// Allocator the constructor prologue calls with the object size.
const ALLOCATOR: &str = "Memory.alloc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

/// (`constructor` | `function` | `method`) (`void` | type) subroutineName
/// `(` parameterList `)` subroutineBody
pub fn construct(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    class_context.symbols.start_subroutine();

    let kind = match class_context.cursor.current_keyword() {
        Some(Keyword::Constructor) => SubroutineKind::Constructor,
        Some(Keyword::Method) => SubroutineKind::Method,
        _ => SubroutineKind::Function,
    };
    class_context.cursor.advance();

    if kind == SubroutineKind::Method {
        // the receiver is the implicit first argument
        let class_name = class_context.class_name.clone();
        class_context.symbols.define("this", &class_name, Kind::Argument);
    }

    if !class_context.eat_keyword(Keyword::Void) {
        class_context.expect_type();
    }

    let name = class_context
        .expect_identifier("a subroutine name")
        .unwrap_or_default();

    class_context.expect_symbol(Symbol::LeftParen);
    construct_parameter_list(class_context);
    class_context.expect_symbol(Symbol::RightParen);

    // subroutineBody: `{` varDec* statements `}`
    class_context.expect_symbol(Symbol::LeftBrace);

    while class_context.cursor.is_keyword(Keyword::Var) {
        construct_var_dec(class_context);
    }

    let function_name = format!("{}.{name}", class_context.class_name);
    let local_count = class_context.symbols.var_count(Kind::Local);
    let prologue = construct_prologue(kind, class_context);

    let body = statement::construct_statements(class_context, program_context);
    class_context.expect_symbol(Symbol::RightBrace);

    debug!("compiled {function_name} ({local_count} locals)");

    [
        vec![vm::function(function_name, local_count)],
        prologue,
        body,
    ]
    .concat()
}

/// Bind `pointer 0` to the object the subroutine works on.
fn construct_prologue(kind: SubroutineKind, class_context: &ClassContext) -> Vec<vm::VMInstruction> {
    match kind {
        SubroutineKind::Constructor => vec![
            vm::push(
                vm::Segment::Constant,
                class_context.symbols.var_count(Kind::Field),
            ),
            vm::call(ALLOCATOR, 1),
            vm::pop(vm::Segment::Pointer, 0),
        ],
        SubroutineKind::Method => vec![
            vm::push(vm::Segment::Argument, 0),
            vm::pop(vm::Segment::Pointer, 0),
        ],
        SubroutineKind::Function => vec![],
    }
}

/// ((type varName) (`,` type varName)*)?
fn construct_parameter_list(class_context: &mut ClassContext) {
    if class_context.cursor.is_symbol(Symbol::RightParen) {
        return;
    }

    loop {
        let r#type = class_context.expect_type().unwrap_or_default();

        if let Some(name) = class_context.expect_identifier("a parameter name") {
            class_context.symbols.define(&name, &r#type, Kind::Argument);
        }

        if !class_context.eat_symbol(Symbol::Comma) {
            break;
        }
    }
}

/// `var` type varName (`,` varName)* `;`
fn construct_var_dec(class_context: &mut ClassContext) {
    class_context.expect_keyword(Keyword::Var);

    let r#type = class_context.expect_type().unwrap_or_default();
    super::define_variables(class_context, &r#type, Kind::Local);

    class_context.expect_symbol(Symbol::Semicolon);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jack::codegen::compile_lines;

    fn compile(lines: &[&str]) -> String {
        let compilation = compile_lines(lines, &mut ProgramContext::new());
        assert!(
            compilation.diagnostics.is_empty(),
            "unexpected diagnostics: {:?}",
            compilation.diagnostics
        );

        vm::VMInstructionBlock::from(compilation.instructions).compile()
    }

    #[test]
    fn test_constructor_allocates_fields() {
        let output = compile(&[
            "class Point {",
            "field int x, y;",
            "static int count;",
            "constructor Point new(int ax, int ay) {",
            "let x = ax; let y = ay;",
            "return this;",
            "}",
            "}",
        ]);

        let expected = [
            "function Point.new 0",
            "push constant 2",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push argument 0",
            "pop this 0",
            "push argument 1",
            "pop this 1",
            "push pointer 0",
            "return",
        ]
        .join("\n");

        assert_eq!(output, expected);
    }

    #[test]
    fn test_method_receives_this_as_argument_zero() {
        let output = compile(&[
            "class Point {",
            "field int x;",
            "method int plus(int dx) {",
            "var int result, unused;",
            "let result = x + dx;",
            "return result;",
            "}",
            "}",
        ]);

        let expected = [
            "function Point.plus 2",
            "push argument 0",
            "pop pointer 0",
            "push this 0",
            "push argument 1",
            "add",
            "pop local 0",
            "push local 0",
            "return",
        ]
        .join("\n");

        assert_eq!(output, expected);
    }

    #[test]
    fn test_void_function() {
        let output = compile(&["class Main {", "function void main() {", "return;", "}", "}"]);

        assert_eq!(
            output,
            ["function Main.main 0", "push constant 0", "return"].join("\n")
        );
    }

    #[test]
    fn test_scopes_are_reset_between_subroutines() {
        let compilation = compile_lines(
            &[
                "class Main {",
                "function void a(int n) { var int i; return; }",
                "function void b() { let i = n; return; }",
                "}",
            ],
            &mut ProgramContext::new(),
        );

        // neither `i` nor `n` is visible in `b`
        assert_eq!(compilation.diagnostics.len(), 2);
    }
}
