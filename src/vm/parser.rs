//! Logic for parsing VM text into [`VMInstruction`]s.

use std::str::SplitWhitespace;

use phf::phf_map;

use super::error::Error;
use super::instruction::{self as vm, LabelAction, Segment, VMCommand, VMInstruction};

/// Largest index any segment accepts (the size of an A-instruction operand).
pub const MAX_INDEX: usize = 32767;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Arithmetic(VMCommand),
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Call,
    Return,
}

static COMMANDS: phf::Map<&'static str, CommandKind> = phf_map! {
    "add" => CommandKind::Arithmetic(VMCommand::Add),
    "sub" => CommandKind::Arithmetic(VMCommand::Sub),
    "neg" => CommandKind::Arithmetic(VMCommand::Neg),
    "eq" => CommandKind::Arithmetic(VMCommand::Eq),
    "gt" => CommandKind::Arithmetic(VMCommand::Gt),
    "lt" => CommandKind::Arithmetic(VMCommand::Lt),
    "and" => CommandKind::Arithmetic(VMCommand::And),
    "or" => CommandKind::Arithmetic(VMCommand::Or),
    "not" => CommandKind::Arithmetic(VMCommand::Not),

    "push" => CommandKind::Push,
    "pop" => CommandKind::Pop,

    "label" => CommandKind::Label,
    "goto" => CommandKind::Goto,
    "if-goto" => CommandKind::If,

    "function" => CommandKind::Function,
    "call" => CommandKind::Call,
    "return" => CommandKind::Return,
};

impl CommandKind {
    pub fn classify(command: &str) -> Option<Self> {
        COMMANDS.get(command).copied()
    }
}

/// Parse every line of a (comment-stripped) VM file.
pub fn parse_program<S: AsRef<str>>(lines: &[S]) -> Result<Vec<VMInstruction>, Error> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(line, index + 1))
        .collect()
}

/// Parse a single VM instruction.
pub fn parse_line(line: &str, line_number: usize) -> Result<VMInstruction, Error> {
    let mut fields = Fields {
        fields: line.split_whitespace(),
        line: line_number,
    };

    let command = fields.next_field("", 1)?;
    let kind = CommandKind::classify(command).ok_or_else(|| Error::UnknownCommand {
        line: line_number,
        command: command.to_owned(),
    })?;

    let instruction = match kind {
        CommandKind::Arithmetic(arithmetic) => vm::command(arithmetic),
        CommandKind::Push => {
            let segment = fields.segment(command)?;
            vm::push(segment, fields.number(command, 2)?)
        }
        CommandKind::Pop => {
            let segment = fields.segment(command)?;
            vm::pop(segment, fields.number(command, 2)?)
        }
        CommandKind::Label => vm::label(LabelAction::Label, fields.label(command)?),
        CommandKind::Goto => vm::label(LabelAction::Goto, fields.label(command)?),
        CommandKind::If => vm::label(LabelAction::IfGoto, fields.label(command)?),
        CommandKind::Function => {
            let name = fields.label(command)?;
            vm::function(name, fields.number(command, 2)?)
        }
        CommandKind::Call => {
            let name = fields.label(command)?;
            vm::call(name, fields.number(command, 2)?)
        }
        CommandKind::Return => vm::vm_return(),
    };

    if let Some(argument) = fields.fields.next() {
        return Err(Error::UnexpectedArgument {
            line: line_number,
            argument: argument.to_owned(),
        });
    }

    validate(&instruction, line_number)?;
    Ok(instruction)
}

/// Check the invariants the code writer relies on:
/// segment indices fit their segment, and nothing is popped into `constant`.
pub fn validate(instruction: &VMInstruction, line: usize) -> Result<(), Error> {
    match instruction {
        VMInstruction::Pop(Segment::Constant, _) => Err(Error::PopConstant { line }),
        VMInstruction::Push(segment, index) | VMInstruction::Pop(segment, index) => {
            let capacity = segment.capacity().unwrap_or(MAX_INDEX + 1);

            if *index < capacity {
                Ok(())
            } else {
                Err(Error::SegmentIndexOutOfRange {
                    line,
                    segment: *segment,
                    index: *index,
                })
            }
        }
        VMInstruction::Function(_, count) | VMInstruction::Call(_, count) if *count > MAX_INDEX => {
            Err(Error::InvalidNumber {
                line,
                value: count.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Labels and function names follow the assembler's symbol rules,
/// minus `$`, which the code writer reserves for scoping.
pub fn is_valid_label(label: &str) -> bool {
    let mut chars = label.chars();
    let is_label_char = |c: char| c.is_ascii_alphanumeric() || "_.:".contains(c);

    chars
        .next()
        .is_some_and(|first| is_label_char(first) && !first.is_ascii_digit())
        && chars.all(is_label_char)
}

struct Fields<'a> {
    fields: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn next_field(&mut self, command: &str, expected: usize) -> Result<&'a str, Error> {
        self.fields.next().ok_or_else(|| Error::MissingArgument {
            line: self.line,
            command: command.to_owned(),
            expected,
        })
    }

    fn segment(&mut self, command: &str) -> Result<Segment, Error> {
        let segment = self.next_field(command, 2)?;

        segment.parse().map_err(|_| Error::UnknownSegment {
            line: self.line,
            segment: segment.to_owned(),
        })
    }

    fn number(&mut self, command: &str, expected: usize) -> Result<usize, Error> {
        let value = self.next_field(command, expected)?;

        value.parse().map_err(|_| Error::InvalidNumber {
            line: self.line,
            value: value.to_owned(),
        })
    }

    fn label(&mut self, command: &str) -> Result<&'a str, Error> {
        let label = self.next_field(command, 1)?;

        if is_valid_label(label) {
            Ok(label)
        } else {
            Err(Error::InvalidLabel {
                line: self.line,
                label: label.to_owned(),
            })
        }
    }
}
