use crate::{
    jack::{
        codegen::context::{ClassContext, ProgramContext},
        error::Error,
        token::{Symbol, TokenKind},
    },
    vm,
};

use super::{literal, subroutine_call, variable};

/// term (op term)*
///
/// Jack has no operator precedence: operators apply strictly left to
/// right, each one after both of its operands are on the stack.
pub fn construct(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    let mut instructions = construct_term(class_context, program_context);

    while let Some(operator) = class_context.cursor.current_binary_operator() {
        class_context.cursor.advance();

        instructions.extend(construct_term(class_context, program_context));
        instructions.extend(binary_operator(operator));
    }

    instructions
}

/// (expression (`,` expression)*)?
///
/// Returns the instructions along with the number of expressions.
pub fn construct_list(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> (Vec<vm::VMInstruction>, usize) {
    if class_context.cursor.is_symbol(Symbol::RightParen) {
        return (vec![], 0);
    }

    let mut instructions = construct(class_context, program_context);
    let mut count = 1;

    while class_context.eat_symbol(Symbol::Comma) {
        instructions.extend(construct(class_context, program_context));
        count += 1;
    }

    (instructions, count)
}

/// integerConstant | stringConstant | keywordConstant | varName |
/// varName `[` expression `]` | subroutineCall | `(` expression `)` |
/// unaryOp term
fn construct_term(
    class_context: &mut ClassContext,
    program_context: &mut ProgramContext,
) -> Vec<vm::VMInstruction> {
    let Some(token) = class_context.cursor.current() else {
        class_context.report_expected("an expression");
        return vec![];
    };

    match &token.kind {
        TokenKind::IntegerConstant(i) => {
            class_context.cursor.advance();
            literal::construct_integer(*i)
        }
        TokenKind::StringConstant(s) => {
            class_context.cursor.advance();
            literal::construct_string(s).unwrap_or_else(|character| {
                class_context.report(Error::OutOfRangeCharacter {
                    character,
                    span: token.span.clone(),
                });
                vec![]
            })
        }
        TokenKind::Keyword(keyword) if class_context.cursor.is_keyword_constant() => {
            class_context.cursor.advance();
            literal::construct_keyword(*keyword)
        }
        TokenKind::Identifier(name) => match class_context.cursor.lookahead_symbol() {
            Some(Symbol::LeftParen | Symbol::Period) => {
                subroutine_call::construct(class_context, program_context)
            }
            Some(Symbol::LeftBracket) => {
                let span = token.span.clone();
                class_context.cursor.advance();
                class_context.cursor.advance();

                let base = variable::push(class_context, name, span);
                let index = construct(class_context, program_context);
                class_context.expect_symbol(Symbol::RightBracket);

                [
                    base,
                    index,
                    vec![
                        vm::command(vm::VMCommand::Add),
                        vm::pop(vm::Segment::Pointer, 1),
                        vm::push(vm::Segment::That, 0),
                    ],
                ]
                .concat()
            }
            _ => {
                class_context.cursor.advance();
                variable::push(class_context, name, token.span.clone())
            }
        },
        TokenKind::Symbol(Symbol::LeftParen) => {
            class_context.cursor.advance();
            let inner = construct(class_context, program_context);
            class_context.expect_symbol(Symbol::RightParen);

            inner
        }
        TokenKind::Symbol(symbol) if symbol.is_unary_operator() => {
            let operator = *symbol;
            class_context.cursor.advance();

            [
                construct_term(class_context, program_context),
                vec![unary_operator(operator)],
            ]
            .concat()
        }
        _ => {
            class_context.report_expected("an expression");
            vec![]
        }
    }
}

fn binary_operator(operator: Symbol) -> Vec<vm::VMInstruction> {
    let command = match operator {
        Symbol::Plus => vm::VMCommand::Add,
        Symbol::Minus => vm::VMCommand::Sub,
        Symbol::Ampersand => vm::VMCommand::And,
        Symbol::Pipe => vm::VMCommand::Or,
        Symbol::Less => vm::VMCommand::Lt,
        Symbol::Greater => vm::VMCommand::Gt,
        Symbol::Equals => vm::VMCommand::Eq,
        Symbol::Asterisk => return vec![vm::call("Math.multiply", 2)],
        Symbol::Slash => return vec![vm::call("Math.divide", 2)],
        _ => return vec![],
    };

    vec![vm::command(command)]
}

const fn unary_operator(operator: Symbol) -> vm::VMInstruction {
    match operator {
        Symbol::Tilde => vm::command(vm::VMCommand::Not),
        _ => vm::command(vm::VMCommand::Neg),
    }
}
