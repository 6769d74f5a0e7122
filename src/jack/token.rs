//! Jack token vocabulary.

use phf::phf_map;

use super::error::Span;

/// Largest integer constant Jack accepts.
pub const MAX_INTEGER: u16 = 32767;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Period,
    Comma,
    Semicolon,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Ampersand,
    Pipe,
    Less,
    Greater,
    Equals,
    Tilde,
}

static SYMBOLS: phf::Map<char, Symbol> = phf_map! {
    '{' => Symbol::LeftBrace,
    '}' => Symbol::RightBrace,
    '(' => Symbol::LeftParen,
    ')' => Symbol::RightParen,
    '[' => Symbol::LeftBracket,
    ']' => Symbol::RightBracket,
    '.' => Symbol::Period,
    ',' => Symbol::Comma,
    ';' => Symbol::Semicolon,
    '+' => Symbol::Plus,
    '-' => Symbol::Minus,
    '*' => Symbol::Asterisk,
    '/' => Symbol::Slash,
    '&' => Symbol::Ampersand,
    '|' => Symbol::Pipe,
    '<' => Symbol::Less,
    '>' => Symbol::Greater,
    '=' => Symbol::Equals,
    '~' => Symbol::Tilde,
};

impl Symbol {
    pub fn from_char(character: char) -> Option<Self> {
        SYMBOLS.get(&character).copied()
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::LeftBrace => '{',
            Self::RightBrace => '}',
            Self::LeftParen => '(',
            Self::RightParen => ')',
            Self::LeftBracket => '[',
            Self::RightBracket => ']',
            Self::Period => '.',
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Asterisk => '*',
            Self::Slash => '/',
            Self::Ampersand => '&',
            Self::Pipe => '|',
            Self::Less => '<',
            Self::Greater => '>',
            Self::Equals => '=',
            Self::Tilde => '~',
        }
    }

    pub const fn is_binary_operator(self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Minus
                | Self::Asterisk
                | Self::Slash
                | Self::Ampersand
                | Self::Pipe
                | Self::Less
                | Self::Greater
                | Self::Equals
        )
    }

    pub const fn is_unary_operator(self) -> bool {
        matches!(self, Self::Minus | Self::Tilde)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(Symbol),
    Identifier(String),
    IntegerConstant(u16),
    StringConstant(String),
}

impl TokenKind {
    /// The token's text as it appeared in the source (without quotes).
    pub fn value(&self) -> String {
        match self {
            Self::Keyword(keyword) => keyword.to_string(),
            Self::Symbol(symbol) => symbol.to_string(),
            Self::Identifier(name) | Self::StringConstant(name) => name.clone(),
            Self::IntegerConstant(value) => value.to_string(),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "keyword `{keyword}`"),
            Self::Symbol(symbol) => write!(f, "`{symbol}`"),
            Self::Identifier(name) => write!(f, "identifier `{name}`"),
            Self::IntegerConstant(value) => write!(f, "integer `{value}`"),
            Self::StringConstant(text) => write!(f, "string \"{text}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use strum::{IntoEnumIterator, VariantNames};

    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!("while".parse::<Keyword>(), Ok(Keyword::While));
        assert_eq!(Keyword::Constructor.to_string(), "constructor");
        assert!("While".parse::<Keyword>().is_err());
        assert_eq!(Keyword::VARIANTS.len(), Keyword::iter().count());
        assert_eq!(Keyword::VARIANTS.len(), 21);
    }

    #[test]
    fn test_symbols() {
        for character in "{}()[].,;+-*/&|<>=~".chars() {
            let symbol = Symbol::from_char(character).expect("should be a symbol");
            assert_eq!(symbol.as_char(), character);
        }

        assert_eq!(Symbol::from_char('#'), None);
        assert!(Symbol::Less.is_binary_operator());
        assert!(Symbol::Minus.is_binary_operator() && Symbol::Minus.is_unary_operator());
        assert!(!Symbol::Tilde.is_binary_operator());
    }

    #[test]
    fn test_token_values() {
        assert_eq!(TokenKind::Keyword(Keyword::Let).value(), "let");
        assert_eq!(TokenKind::IntegerConstant(42).value(), "42");
        assert_eq!(
            TokenKind::StringConstant(String::from("hi there")).to_string(),
            "string \"hi there\""
        );
    }
}
