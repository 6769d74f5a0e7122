//! Jack tokenizer.
//!
//! Works on comment-stripped lines. Every token is the longest match at its
//! position, so reserved words only become keywords when they stand alone
//! (`classy` and `doIt` are identifiers), and a string literal is always
//! consumed in one piece, whatever it contains.

use std::collections::VecDeque;

use chumsky::prelude::*;

use super::error::{Error, Span};
use super::token::{Keyword, Symbol, Token, TokenKind, MAX_INTEGER};

type JackLexError = Simple<char>;

/// A lazy, forward-only stream of tokens over source lines.
///
/// Lines are scanned one at a time, on demand. Lexical errors are yielded
/// in place of a token; lexing resumes right after the offending text.
#[derive(Debug, Clone)]
pub struct Lexer<'s, S> {
    lines: &'s [S],
    line_index: usize,
    /// Byte offset of the current line in the `\n`-joined source.
    line_offset: usize,
    pending: VecDeque<Result<Token, Error>>,
}

impl<'s, S: AsRef<str>> Lexer<'s, S> {
    pub const fn new(lines: &'s [S]) -> Self {
        Self {
            lines,
            line_index: 0,
            line_offset: 0,
            pending: VecDeque::new(),
        }
    }
}

impl<'s, S: AsRef<str>> Iterator for Lexer<'s, S> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }

            let lines = self.lines;
            let line = lines.get(self.line_index)?.as_ref();
            self.pending.extend(scan_line(line, self.line_offset));

            self.line_offset += line.len() + 1;
            self.line_index += 1;
        }
    }
}

/// Split the stream into tokens and lexical errors.
pub fn tokenize<S: AsRef<str>>(lines: &[S]) -> (Vec<Token>, Vec<Error>) {
    let mut tokens = vec![];
    let mut errors = vec![];

    for item in Lexer::new(lines) {
        match item {
            Ok(token) => tokens.push(token),
            Err(error) => errors.push(error),
        }
    }

    (tokens, errors)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scanned {
    Token(TokenKind),
    UnterminatedString,
    OutOfRange(String),
    Unrecognized(String),
}

/// Scan one line, turning the parser's char positions into byte spans
/// of the joined source.
fn scan_line(line: &str, line_offset: usize) -> Vec<Result<Token, Error>> {
    let byte_offset = |index: usize| {
        line_offset
            + line
                .char_indices()
                .nth(index)
                .map_or(line.len(), |(offset, _)| offset)
    };

    let scanned = match line_lexer().parse(line) {
        Ok(scanned) => scanned,
        // every non-blank character is accepted by some rule
        Err(_) => {
            return vec![Err(Error::Lex {
                text: line.trim().to_owned(),
                span: line_offset..line_offset + line.len(),
            })]
        }
    };

    scanned
        .into_iter()
        .map(|(scanned, span)| {
            let span: Span = byte_offset(span.start)..byte_offset(span.end);

            match scanned {
                Scanned::Token(kind) => Ok(Token::new(kind, span)),
                Scanned::UnterminatedString => Err(Error::UnterminatedString { span }),
                Scanned::OutOfRange(text) => Err(Error::OutOfRangeConstant { text, span }),
                Scanned::Unrecognized(text) => Err(Error::Lex { text, span }),
            }
        })
        .collect()
}

// region: grammar

const fn is_identifier_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}

fn is_token_start(character: char) -> bool {
    is_identifier_char(character) || character == '"' || Symbol::from_char(character).is_some()
}

/// Every token of one line, in order. Never fails on its own: text that
/// no rule recognizes becomes [`Scanned::Unrecognized`].
fn line_lexer() -> impl Parser<char, Vec<(Scanned, Span)>, Error = JackLexError> {
    choice((string(), integer(), word(), symbol(), unrecognized()))
        .map_with_span(|scanned, span| (scanned, span))
        .padded()
        .repeated()
        .then_ignore(end())
}

/// A literal cannot continue on the next line.
fn string() -> impl Parser<char, Scanned, Error = JackLexError> {
    just('"')
        .ignore_then(none_of('"').repeated().collect::<String>())
        .then(just('"').or_not())
        .map(|(body, closing)| match closing {
            Some(_) => Scanned::Token(TokenKind::StringConstant(body)),
            None => Scanned::UnterminatedString,
        })
}

fn integer() -> impl Parser<char, Scanned, Error = JackLexError> {
    text::digits(10).map(|digits: String| match digits.parse::<u16>() {
        Ok(value) if value <= MAX_INTEGER => Scanned::Token(TokenKind::IntegerConstant(value)),
        _ => Scanned::OutOfRange(digits),
    })
}

/// Longest run of identifier characters, so `classy` is not `class` + `y`.
fn word() -> impl Parser<char, Scanned, Error = JackLexError> {
    filter(|c: &char| is_identifier_char(*c))
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(|word| {
            let kind = word
                .parse::<Keyword>()
                .map_or_else(|_| TokenKind::Identifier(word), TokenKind::Keyword);

            Scanned::Token(kind)
        })
}

fn symbol() -> impl Parser<char, Scanned, Error = JackLexError> {
    filter_map(|span, c: char| {
        Symbol::from_char(c)
            .map(|symbol| Scanned::Token(TokenKind::Symbol(symbol)))
            .ok_or_else(|| Simple::custom(span, format!("`{c}` is not a symbol")))
    })
}

fn unrecognized() -> impl Parser<char, Scanned, Error = JackLexError> {
    filter(|c: &char| !c.is_whitespace())
        .chain(filter(|c: &char| !c.is_whitespace() && !is_token_start(*c)).repeated())
        .collect::<String>()
        .map(Scanned::Unrecognized)
}

// endregion

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(lines: &[&str]) -> Vec<TokenKind> {
        let (tokens, errors) = tokenize(lines);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");

        tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_statement() {
        assert_eq!(
            kinds(&["let x = x + 1;"]),
            vec![
                TokenKind::Keyword(Keyword::Let),
                TokenKind::Identifier(String::from("x")),
                TokenKind::Symbol(Symbol::Equals),
                TokenKind::Identifier(String::from("x")),
                TokenKind::Symbol(Symbol::Plus),
                TokenKind::IntegerConstant(1),
                TokenKind::Symbol(Symbol::Semicolon),
            ]
        );
    }

    #[test]
    fn test_string_literal_is_never_split() {
        assert_eq!(
            kinds(&["do Output.printString(\"let x = 1; // not a comment\");"]),
            vec![
                TokenKind::Keyword(Keyword::Do),
                TokenKind::Identifier(String::from("Output")),
                TokenKind::Symbol(Symbol::Period),
                TokenKind::Identifier(String::from("printString")),
                TokenKind::Symbol(Symbol::LeftParen),
                TokenKind::StringConstant(String::from("let x = 1; // not a comment")),
                TokenKind::Symbol(Symbol::RightParen),
                TokenKind::Symbol(Symbol::Semicolon),
            ]
        );
    }

    #[test]
    fn test_keyword_prefixes_are_identifiers() {
        assert_eq!(
            kinds(&["classy doIt if_ while"]),
            vec![
                TokenKind::Identifier(String::from("classy")),
                TokenKind::Identifier(String::from("doIt")),
                TokenKind::Identifier(String::from("if_")),
                TokenKind::Keyword(Keyword::While),
            ]
        );
    }

    #[test]
    fn test_adjacent_tokens_without_spaces() {
        assert_eq!(
            kinds(&["a[i]=~b;"]),
            vec![
                TokenKind::Identifier(String::from("a")),
                TokenKind::Symbol(Symbol::LeftBracket),
                TokenKind::Identifier(String::from("i")),
                TokenKind::Symbol(Symbol::RightBracket),
                TokenKind::Symbol(Symbol::Equals),
                TokenKind::Symbol(Symbol::Tilde),
                TokenKind::Identifier(String::from("b")),
                TokenKind::Symbol(Symbol::Semicolon),
            ]
        );
    }

    #[test]
    fn test_spans_cover_joined_lines() {
        let (tokens, _) = tokenize(&["class Main {", "  field int x;"]);

        assert_eq!(tokens[0].span, 0..5);
        assert_eq!(tokens[2].span, 11..12);
        // "class Main {\n" is 13 bytes
        assert_eq!(tokens[3].span, 15..20);
        assert_eq!(tokens[3].kind, TokenKind::Keyword(Keyword::Field));
    }

    #[test]
    fn test_errors_do_not_stop_lexing() {
        let (tokens, errors) = tokenize(&["let # = 40000;", "let s = \"open"]);

        assert_eq!(
            errors,
            vec![
                Error::Lex {
                    text: String::from("#"),
                    span: 4..5,
                },
                Error::OutOfRangeConstant {
                    text: String::from("40000"),
                    span: 8..13,
                },
                Error::UnterminatedString { span: 23..28 },
            ]
        );
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let (tokens, _) = tokenize(&["let s = \"h\u{e9}llo\";", "x"]);

        assert_eq!(tokens[3].kind, TokenKind::StringConstant(String::from("h\u{e9}llo")));
        assert_eq!(tokens[3].span, 8..16);
        assert_eq!(tokens[4].span, 16..17);
        assert_eq!(tokens[5].span, 18..19);
    }

    #[test]
    fn test_lexer_is_lazy() {
        let lines = ["let", "@@@"];
        let mut lexer = Lexer::new(&lines);

        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(Error::Lex { .. }))));
        assert_eq!(lexer.next(), None);
    }
}
