//! One-token-lookahead cursor over an immutable token buffer.

use super::error::Span;
use super::token::{Keyword, Symbol, Token, TokenKind};

#[derive(Debug, Clone)]
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    position: usize,
    /// Span reported when the input runs out.
    end: Span,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        let end = tokens
            .last()
            .map_or(0..0, |token| token.span.end..token.span.end);

        Self {
            tokens,
            position: 0,
            end,
        }
    }

    pub fn has_more_tokens(&self) -> bool {
        self.position < self.tokens.len()
    }

    pub fn current(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    pub fn lookahead(&self) -> Option<&'t Token> {
        self.tokens.get(self.position + 1)
    }

    /// Move past the current token, returning it.
    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.current()?;
        self.position += 1;
        Some(token)
    }

    /// Span of the current token, or an empty span at the end of input.
    pub fn span(&self) -> Span {
        self.current().map_or_else(|| self.end.clone(), |token| token.span.clone())
    }

    fn current_kind(&self) -> Option<&'t TokenKind> {
        self.current().map(|token| &token.kind)
    }

    // region: grammar predicates

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.current_keyword() == Some(keyword)
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.current_symbol() == Some(symbol)
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.current_kind(), Some(TokenKind::Identifier(_)))
    }

    pub fn current_keyword(&self) -> Option<Keyword> {
        match self.current_kind()? {
            TokenKind::Keyword(keyword) => Some(*keyword),
            _ => None,
        }
    }

    pub fn current_symbol(&self) -> Option<Symbol> {
        match self.current_kind()? {
            TokenKind::Symbol(symbol) => Some(*symbol),
            _ => None,
        }
    }

    pub fn lookahead_symbol(&self) -> Option<Symbol> {
        match &self.lookahead()?.kind {
            TokenKind::Symbol(symbol) => Some(*symbol),
            _ => None,
        }
    }

    /// `static` | `field`
    pub fn is_class_var_dec(&self) -> bool {
        matches!(self.current_keyword(), Some(Keyword::Static | Keyword::Field))
    }

    /// `constructor` | `function` | `method`
    pub fn is_subroutine_dec(&self) -> bool {
        matches!(
            self.current_keyword(),
            Some(Keyword::Constructor | Keyword::Function | Keyword::Method)
        )
    }

    /// `int` | `char` | `boolean` | className
    pub fn is_type(&self) -> bool {
        self.is_identifier()
            || matches!(
                self.current_keyword(),
                Some(Keyword::Int | Keyword::Char | Keyword::Boolean)
            )
    }

    /// `let` | `if` | `while` | `do` | `return`
    pub fn is_statement(&self) -> bool {
        matches!(
            self.current_keyword(),
            Some(Keyword::Let | Keyword::If | Keyword::While | Keyword::Do | Keyword::Return)
        )
    }

    /// `true` | `false` | `null` | `this`
    pub fn is_keyword_constant(&self) -> bool {
        matches!(
            self.current_keyword(),
            Some(Keyword::True | Keyword::False | Keyword::Null | Keyword::This)
        )
    }

    pub fn current_binary_operator(&self) -> Option<Symbol> {
        self.current_symbol()
            .filter(|symbol| symbol.is_binary_operator())
    }

    pub fn current_unary_operator(&self) -> Option<Symbol> {
        self.current_symbol()
            .filter(|symbol| symbol.is_unary_operator())
    }

    // endregion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jack::lexer::tokenize;

    #[test]
    fn test_navigation() {
        let (tokens, _) = tokenize(&["let a[2] = 1;"]);
        let mut cursor = TokenCursor::new(&tokens);

        assert!(cursor.is_statement());
        assert!(cursor.is_keyword(Keyword::Let));
        assert_eq!(cursor.advance().map(|token| token.kind.value()), Some(String::from("let")));

        assert!(cursor.is_identifier());
        assert_eq!(cursor.lookahead_symbol(), Some(Symbol::LeftBracket));

        while cursor.advance().is_some() {}

        assert!(!cursor.has_more_tokens());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.span(), 13..13);
    }

    #[test]
    fn test_predicates() {
        let (tokens, _) = tokenize(&["field Point - true"]);
        let mut cursor = TokenCursor::new(&tokens);

        assert!(cursor.is_class_var_dec());
        assert!(!cursor.is_type());
        cursor.advance();

        assert!(cursor.is_type());
        cursor.advance();

        assert_eq!(cursor.current_binary_operator(), Some(Symbol::Minus));
        assert_eq!(cursor.current_unary_operator(), Some(Symbol::Minus));
        cursor.advance();

        assert!(cursor.is_keyword_constant());
        assert!(!cursor.is_subroutine_dec());
    }
}
