use crate::{
    jack::{
        codegen::context::{ClassContext, ProgramContext},
        token::{Keyword, Symbol},
    },
    vm,
};

use super::{expression, subroutine_call, variable};

/// statement*
///
/// Anything that does not start a statement before the closing `}` is
/// reported once, then skipped up to the next statement boundary.
pub fn construct_statements(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    let mut instructions = vec![];

    loop {
        if class_context.cursor.is_statement() {
            instructions.extend(construct(class_context, program_context));
        } else if class_context.cursor.is_symbol(Symbol::RightBrace)
            || !class_context.cursor.has_more_tokens()
        {
            break;
        } else {
            class_context.report_expected("a statement");
            class_context.synchronize();
        }
    }

    instructions
}

fn construct(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    match class_context.cursor.current_keyword() {
        Some(Keyword::Let) => construct_let(class_context, program_context),
        Some(Keyword::If) => construct_if(class_context, program_context),
        Some(Keyword::While) => construct_while(class_context, program_context),
        Some(Keyword::Do) => construct_do(class_context, program_context),
        _ => construct_return(class_context, program_context),
    }
}

/// `let` varName (`[` expression `]`)? `=` expression `;`
fn construct_let(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    class_context.expect_keyword(Keyword::Let);

    let span = class_context.cursor.span();
    let name = class_context
        .expect_identifier("a variable name")
        .unwrap_or_default();

    let instructions = if class_context.eat_symbol(Symbol::LeftBracket) {
        let base = variable::push(class_context, &name, span);
        let index = expression::construct(class_context, program_context);
        class_context.expect_symbol(Symbol::RightBracket);
        class_context.expect_symbol(Symbol::Equals);
        let value = expression::construct(class_context, program_context);

        [
            base,
            index,
            vec![vm::command(vm::VMCommand::Add)],
            value,
            // the value expression may itself use `that`, so the target
            // address is only bound once the value is computed
            vec![
                vm::pop(vm::Segment::Temp, 0),
                vm::pop(vm::Segment::Pointer, 1),
                vm::push(vm::Segment::Temp, 0),
                vm::pop(vm::Segment::That, 0),
            ],
        ]
        .concat()
    } else {
        class_context.expect_symbol(Symbol::Equals);
        let value = expression::construct(class_context, program_context);

        [value, variable::pop(class_context, &name, span)].concat()
    };

    class_context.expect_symbol(Symbol::Semicolon);
    instructions
}

/// `if` `(` expression `)` `{` statements `}` (`else` `{` statements `}`)?
fn construct_if(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    let id = program_context.labels.next_id();
    let else_label = format!("IF_ELSE_{id}");
    let end_label = format!("IF_END_{id}");

    class_context.expect_keyword(Keyword::If);
    let condition = construct_condition(class_context, program_context);
    let then_branch = construct_block(class_context, program_context);

    let else_branch = if class_context.eat_keyword(Keyword::Else) {
        construct_block(class_context, program_context)
    } else {
        vec![]
    };

    [
        condition,
        vec![
            vm::command(vm::VMCommand::Not),
            vm::label(vm::LabelAction::IfGoto, else_label.as_str()),
        ],
        then_branch,
        vec![
            vm::label(vm::LabelAction::Goto, end_label.as_str()),
            vm::label(vm::LabelAction::Label, else_label),
        ],
        else_branch,
        vec![vm::label(vm::LabelAction::Label, end_label)],
    ]
    .concat()
}

/// `while` `(` expression `)` `{` statements `}`
fn construct_while(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    let id = program_context.labels.next_id();
    let loop_label = format!("WHILE_LOOP_{id}");
    let end_label = format!("WHILE_END_{id}");

    class_context.expect_keyword(Keyword::While);
    let condition = construct_condition(class_context, program_context);
    let body = construct_block(class_context, program_context);

    [
        vec![vm::label(vm::LabelAction::Label, loop_label.as_str())],
        condition,
        vec![
            vm::command(vm::VMCommand::Not),
            vm::label(vm::LabelAction::IfGoto, end_label.as_str()),
        ],
        body,
        vec![
            vm::label(vm::LabelAction::Goto, loop_label),
            vm::label(vm::LabelAction::Label, end_label),
        ],
    ]
    .concat()
}

/// `do` subroutineCall `;`
fn construct_do(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    class_context.expect_keyword(Keyword::Do);
    let call = subroutine_call::construct(class_context, program_context);
    class_context.expect_symbol(Symbol::Semicolon);

    // the returned value is discarded
    [call, vec![vm::pop(vm::Segment::Temp, 0)]].concat()
}

/// `return` expression? `;`
fn construct_return(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    class_context.expect_keyword(Keyword::Return);

    if class_context.eat_symbol(Symbol::Semicolon) {
        // every subroutine leaves exactly one value on the stack
        return vec![vm::r#false(), vm::vm_return()];
    }

    let value = expression::construct(class_context, program_context);
    class_context.expect_symbol(Symbol::Semicolon);
    [value, vec![vm::vm_return()]].concat()
}

/// `(` expression `)`
fn construct_condition(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    class_context.expect_symbol(Symbol::LeftParen);
    let condition = expression::construct(class_context, program_context);
    class_context.expect_symbol(Symbol::RightParen);

    condition
}

/// `{` statements `}`
fn construct_block(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    class_context.expect_symbol(Symbol::LeftBrace);
    let statements = construct_statements(class_context, program_context);
    class_context.expect_symbol(Symbol::RightBrace);

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jack::{codegen::compile_lines, error::Error};

    fn compile_body(body: &[&str], program_context: &mut ProgramContext) -> Vec<vm::VMInstruction> {
        let lines = [
            vec!["class Main {", "static Array a;", "function void main() {", "var int x, y;"],
            body.to_vec(),
            vec!["return;", "}", "}"],
        ]
        .concat();

        let compilation = compile_lines(&lines, program_context);
        assert!(
            compilation.diagnostics.is_empty(),
            "unexpected diagnostics: {:?}",
            compilation.diagnostics
        );

        compilation.instructions
    }

    fn count(instructions: &[vm::VMInstruction], predicate: impl Fn(&vm::VMInstruction) -> bool) -> usize {
        instructions.iter().filter(|instruction| predicate(instruction)).count()
    }

    #[test]
    fn test_if_else() {
        let instructions = compile_body(
            &["if (x > 0) { let y = 1; } else { let y = 0; }"],
            &mut ProgramContext::new(),
        );

        assert_eq!(
            count(&instructions, |i| *i == vm::command(vm::VMCommand::Not)),
            1
        );
        assert_eq!(
            count(&instructions, |i| matches!(i, vm::VMInstruction::Label(vm::LabelAction::IfGoto, _))),
            1
        );
        assert_eq!(
            count(&instructions, |i| matches!(i, vm::VMInstruction::Label(vm::LabelAction::Goto, _))),
            1
        );

        let labels: Vec<&vm::VMInstruction> = instructions
            .iter()
            .filter(|i| matches!(i, vm::VMInstruction::Label(vm::LabelAction::Label, _)))
            .collect();
        assert_eq!(labels.len(), 2);
        assert_ne!(labels[0], labels[1]);

        // both branches store into `y`
        assert_eq!(
            count(&instructions, |i| *i == vm::pop(vm::Segment::Local, 1)),
            2
        );
    }

    #[test]
    fn test_while() {
        let instructions = compile_body(&["while (x < 10) { let x = x + 1; }"], &mut ProgramContext::new());

        let expected = [
            "function Main.main 2",
            "label WHILE_LOOP_0",
            "push local 0",
            "push constant 10",
            "lt",
            "not",
            "if-goto WHILE_END_0",
            "push local 0",
            "push constant 1",
            "add",
            "pop local 0",
            "goto WHILE_LOOP_0",
            "label WHILE_END_0",
            "push constant 0",
            "return",
        ]
        .join("\n");

        assert_eq!(vm::VMInstructionBlock::from(instructions).compile(), expected);
    }

    #[test]
    fn test_labels_are_unique_across_classes() {
        let mut program_context = ProgramContext::new();

        let first = compile_body(&["while (x) { }"], &mut program_context);
        let second = compile_body(&["while (x) { }"], &mut program_context);

        assert!(first.contains(&vm::label(vm::LabelAction::Label, "WHILE_LOOP_0")));
        assert!(second.contains(&vm::label(vm::LabelAction::Label, "WHILE_LOOP_1")));
    }

    #[test]
    fn test_array_assignment() {
        let instructions = compile_body(&["let a[x] = a[y];"], &mut ProgramContext::new());

        let expected = [
            "function Main.main 2",
            "push static 0",
            "push local 0",
            "add",
            "push static 0",
            "push local 1",
            "add",
            "pop pointer 1",
            "push that 0",
            "pop temp 0",
            "pop pointer 1",
            "push temp 0",
            "pop that 0",
            "push constant 0",
            "return",
        ]
        .join("\n");

        assert_eq!(vm::VMInstructionBlock::from(instructions).compile(), expected);
    }

    #[test]
    fn test_do_discards_result() {
        let instructions = compile_body(&["do Output.printInt(x);"], &mut ProgramContext::new());

        assert_eq!(
            instructions[1..4],
            [
                vm::push(vm::Segment::Local, 0),
                vm::call("Output.printInt", 1),
                vm::pop(vm::Segment::Temp, 0),
            ]
        );
    }

    #[test]
    fn test_recovery_after_bad_statement() {
        let compilation = compile_lines(
            &[
                "class Main {",
                "function int main() {",
                "var int x;",
                "x = 5;",
                "let x = 1;",
                "return x;",
                "}",
                "}",
            ],
            &mut ProgramContext::new(),
        );

        assert_eq!(compilation.diagnostics.len(), 1);
        assert!(matches!(compilation.diagnostics[0], Error::Parse { .. }));

        // the statements after the bad one still compile
        assert!(compilation
            .instructions
            .contains(&vm::pop(vm::Segment::Local, 0)));
        assert_eq!(compilation.instructions.last(), Some(&vm::vm_return()));
    }
}
