use thiserror::Error;

/// Byte range into the source lines joined with `\n`.
pub type Span = std::ops::Range<usize>;

/// Diagnostics produced while compiling a Jack class.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unrecognized input `{text}`")]
    Lex { text: String, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("integer constant `{text}` is out of range (0..=32767)")]
    OutOfRangeConstant { text: String, span: Span },

    #[error("character `{character}` in string constant is out of range (0..=32767)")]
    OutOfRangeCharacter { character: char, span: Span },

    #[error("expected {expected}, found {found}")]
    Parse {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("`{name}` is not defined")]
    UndefinedVariable { name: String, span: Span },
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Self::Lex { span, .. }
            | Self::UnterminatedString { span }
            | Self::OutOfRangeConstant { span, .. }
            | Self::OutOfRangeCharacter { span, .. }
            | Self::Parse { span, .. }
            | Self::UndefinedVariable { span, .. } => span.clone(),
        }
    }

    /// Short category name, used as the headline of rendered reports.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Lex { .. } | Self::UnterminatedString { .. } => "Lexer error",
            Self::OutOfRangeConstant { .. } | Self::OutOfRangeCharacter { .. } => "Constant error",
            Self::Parse { .. } => "Parser error",
            Self::UndefinedVariable { .. } => "Scope error",
        }
    }
}
