use crate::{
    jack::{
        codegen::context::{ClassContext, ProgramContext},
        token::Symbol,
    },
    vm,
};

use super::expression;

/// subroutineName `(` expressionList `)` |
/// (className | varName) `.` subroutineName `(` expressionList `)`
pub fn construct(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    let name = class_context
        .expect_identifier("a subroutine name")
        .unwrap_or_default();

    let (receiver, callee) = if class_context.eat_symbol(Symbol::Period) {
        let subroutine_name = class_context
            .expect_identifier("a subroutine name")
            .unwrap_or_default();

        match class_context.symbols.lookup(&name) {
            // method call on an object held in a variable
            Some(entry) => (
                Some(entry.push()),
                format!("{}.{subroutine_name}", entry.r#type),
            ),
            // function or constructor of another class
            None => (None, format!("{name}.{subroutine_name}")),
        }
    } else {
        // method call on the current object
        (
            Some(vm::push(vm::Segment::Pointer, 0)),
            format!("{}.{name}", class_context.class_name),
        )
    };

    class_context.expect_symbol(Symbol::LeftParen);
    let (arguments, argument_count) = expression::construct_list(class_context, program_context);
    class_context.expect_symbol(Symbol::RightParen);

    let argument_count = argument_count + usize::from(receiver.is_some());

    [
        receiver.into_iter().collect::<Vec<_>>(),
        arguments,
        vec![vm::call(callee, argument_count)],
    ]
    .concat()
}
