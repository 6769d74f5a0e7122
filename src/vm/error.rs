use thiserror::Error;

use super::instruction::Segment;

/// Everything that aborts translating a VM unit. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: unknown segment `{segment}`")]
    UnknownSegment { line: usize, segment: String },

    #[error("line {line}: `{command}` requires {expected} argument(s)")]
    MissingArgument {
        line: usize,
        command: String,
        expected: usize,
    },

    #[error("line {line}: unexpected argument `{argument}`")]
    UnexpectedArgument { line: usize, argument: String },

    #[error("line {line}: cannot parse `{value}` as a non-negative number")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: `{label}` is not a valid label")]
    InvalidLabel { line: usize, label: String },

    #[error("line {line}: cannot pop into the constant segment")]
    PopConstant { line: usize },

    #[error("line {line}: index {index} is out of range for segment `{segment}`")]
    SegmentIndexOutOfRange {
        line: usize,
        segment: Segment,
        index: usize,
    },
}
