//! Logic for parsing Hack assembly lines into [`Instruction`]s.
//!
//! Parsing is done in two steps: a `chumsky` grammar splits a line into its
//! raw fields, then every mnemonic is looked up in the closed tables of
//! [`super::instruction`], so a misspelled field is reported as such instead
//! of being encoded as zero bits.

use std::str::FromStr;

use chumsky::prelude::*;

use super::error::{Error, Field};
use super::instruction::{Instruction, MAX_ADDRESS};

pub type HackParseError = Simple<char>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Literal(String),
    Symbol(String),
}

/// One assembly line, split into fields but not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Statement {
    Address(Operand),
    Label(String),
    Compute {
        dest: Option<String>,
        comp: String,
        jump: Option<String>,
    },
}

/// Parse every line of a (comment-stripped) assembly program,
/// pairing each instruction with its 1-based line number.
pub fn parse_program<S: AsRef<str>>(lines: &[S]) -> Result<Vec<(usize, Instruction)>, Error> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(line, index + 1).map(|instruction| (index + 1, instruction)))
        .collect()
}

/// Parse a single assembly line.
pub fn parse_line(line: &str, line_number: usize) -> Result<Instruction, Error> {
    let statement = statement().parse(line).map_err(|_| Error::Syntax {
        line: line_number,
        text: line.to_owned(),
    })?;

    resolve(statement, line_number)
}

fn resolve(statement: Statement, line: usize) -> Result<Instruction, Error> {
    match statement {
        Statement::Label(name) => Ok(Instruction::Label(name)),
        Statement::Address(Operand::Symbol(symbol)) => Ok(Instruction::at(symbol)),
        Statement::Address(Operand::Literal(digits)) => match digits.parse::<u16>() {
            Ok(value) if value <= MAX_ADDRESS => Ok(Instruction::value(value)),
            _ => Err(Error::AddressOutOfRange {
                line,
                value: digits,
            }),
        },
        Statement::Compute { dest, comp, jump } => Ok(Instruction::Compute {
            dest: dest
                .map(|dest| lookup(dest, Field::Dest, line))
                .transpose()?,
            comp: lookup(comp, Field::Comp, line)?,
            jump: jump
                .map(|jump| lookup(jump, Field::Jump, line))
                .transpose()?,
        }),
    }
}

fn lookup<T: FromStr>(mnemonic: String, field: Field, line: usize) -> Result<T, Error> {
    mnemonic.parse().map_err(|_| Error::UnknownMnemonic {
        line,
        field,
        mnemonic,
    })
}

// region: grammar

fn statement() -> impl Parser<char, Statement, Error = HackParseError> {
    choice((address(), label(), compute()))
        .padded()
        .then_ignore(end())
}

/// `[A-Za-z_.$:][A-Za-z0-9_.$:]*`
fn symbol() -> impl Parser<char, String, Error = HackParseError> + Clone {
    let is_symbol_char = |c: &char| c.is_ascii_alphanumeric() || "_.$:".contains(*c);

    filter(move |c: &char| is_symbol_char(c) && !c.is_ascii_digit())
        .chain(filter(is_symbol_char).repeated())
        .collect()
}

fn address() -> impl Parser<char, Statement, Error = HackParseError> {
    let literal = text::digits(10).map(Operand::Literal);
    let symbol = symbol().map(Operand::Symbol);

    just('@')
        .ignore_then(literal.or(symbol))
        .map(Statement::Address)
}

fn label() -> impl Parser<char, Statement, Error = HackParseError> {
    symbol()
        .delimited_by(just('('), just(')'))
        .map(Statement::Label)
}

fn compute() -> impl Parser<char, Statement, Error = HackParseError> {
    let register = filter(|c: &char| c.is_ascii_alphabetic())
        .repeated()
        .at_least(1)
        .collect::<String>();

    let dest = register.clone().then_ignore(just('='));

    // anything up to the jump field, validated against the comp table afterwards
    let comp = filter(|c: &char| !c.is_whitespace() && !"();@=".contains(*c))
        .repeated()
        .at_least(1)
        .collect::<String>();

    let jump = just(';').ignore_then(register);

    // a bare computation is neither stored nor jumped on
    dest.or_not()
        .then(comp)
        .then(jump.or_not())
        .try_map(|((dest, comp), jump), span| {
            if dest.is_none() && jump.is_none() {
                Err(Simple::custom(span, "expected a dest or a jump"))
            } else {
                Ok(Statement::Compute { dest, comp, jump })
            }
        })
}

// endregion

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hack::instruction::{Comp, Dest, Jump};

    #[test]
    fn test_address_instructions() {
        assert_eq!(parse_line("@21", 1), Ok(Instruction::value(21)));
        assert_eq!(parse_line("@LOOP", 1), Ok(Instruction::at("LOOP")));
        assert_eq!(
            parse_line("@Main.main$ret$0", 1),
            Ok(Instruction::at("Main.main$ret$0"))
        );
        assert_eq!(parse_line("@32767", 1), Ok(Instruction::value(32767)));
    }

    #[test]
    fn test_compute_instructions() {
        assert_eq!(
            parse_line("AM=M-1", 1),
            Ok(Instruction::assign(Dest::Am, Comp::MMinusOne))
        );
        assert_eq!(
            parse_line("0;JMP", 1),
            Ok(Instruction::jump(Comp::Zero, Jump::Jmp))
        );
        assert_eq!(
            parse_line("D;JGT", 1),
            Ok(Instruction::jump(Comp::D, Jump::Jgt))
        );
        assert_eq!(
            parse_line("MD=D|M;JNE", 1),
            Ok(Instruction::Compute {
                dest: Some(Dest::Md),
                comp: Comp::DOrM,
                jump: Some(Jump::Jne),
            })
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(parse_line("(END)", 1), Ok(Instruction::label("END")));
        assert_eq!(
            parse_line("(Sys.init$WHILE_END_0)", 1),
            Ok(Instruction::label("Sys.init$WHILE_END_0"))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_line("D=X", 4),
            Err(Error::UnknownMnemonic {
                line: 4,
                field: Field::Comp,
                mnemonic: String::from("X"),
            })
        );
        assert_eq!(
            parse_line("Q=D", 2),
            Err(Error::UnknownMnemonic {
                line: 2,
                field: Field::Dest,
                mnemonic: String::from("Q"),
            })
        );
        assert_eq!(
            parse_line("D;JUMP", 3),
            Err(Error::UnknownMnemonic {
                line: 3,
                field: Field::Jump,
                mnemonic: String::from("JUMP"),
            })
        );
        assert_eq!(
            parse_line("@40000", 1),
            Err(Error::AddressOutOfRange {
                line: 1,
                value: String::from("40000"),
            })
        );
        assert!(matches!(parse_line("(LOOP", 7), Err(Error::Syntax { line: 7, .. })));
        assert!(matches!(parse_line("@1abc", 1), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_bare_computation_is_rejected() {
        assert_eq!(
            parse_line("D", 5),
            Err(Error::Syntax {
                line: 5,
                text: String::from("D"),
            })
        );
        assert!(matches!(parse_line("M+1", 1), Err(Error::Syntax { .. })));
        assert_eq!(parse_line("0;JMP", 1), Ok(Instruction::jump(Comp::Zero, Jump::Jmp)));
    }

    #[test]
    fn test_program_line_numbers() {
        let program = parse_program(&["@2", "D=A", "(END)"]).expect("valid program");
        let numbers: Vec<usize> = program.iter().map(|(line, _)| *line).collect();

        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
