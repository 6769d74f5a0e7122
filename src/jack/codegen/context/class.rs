use log::warn;

use crate::jack::{
    cursor::TokenCursor,
    error::Error,
    symbol_table::SymbolTable,
    token::{Keyword, Symbol, Token, TokenKind},
};

/// Context information regarding the class being compiled.
#[derive(Debug)]
pub struct Context<'t> {
    pub class_name: String,
    pub symbols: SymbolTable,
    pub cursor: TokenCursor<'t>,
    pub diagnostics: Vec<Error>,
}

impl<'t> Context<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            class_name: String::new(),
            symbols: SymbolTable::new(),
            cursor: TokenCursor::new(tokens),
            diagnostics: vec![],
        }
    }

    pub fn report(&mut self, error: Error) {
        warn!("{}: {error}", self.class_name);
        self.diagnostics.push(error);
    }

    /// Record that the current token does not match the grammar.
    /// The token is not consumed.
    pub fn report_expected(&mut self, expected: &str) {
        let found = self
            .cursor
            .current()
            .map_or_else(|| String::from("end of input"), |token| token.kind.to_string());

        self.report(Error::Parse {
            expected: expected.to_owned(),
            found,
            span: self.cursor.span(),
        });
    }

    // region: token consumption

    /// Consume the current token if it is `symbol`.
    pub fn eat_symbol(&mut self, symbol: Symbol) -> bool {
        let matched = self.cursor.is_symbol(symbol);
        if matched {
            self.cursor.advance();
        }
        matched
    }

    /// Consume the current token if it is `keyword`.
    pub fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.cursor.is_keyword(keyword);
        if matched {
            self.cursor.advance();
        }
        matched
    }

    pub fn expect_symbol(&mut self, symbol: Symbol) -> bool {
        let matched = self.eat_symbol(symbol);
        if !matched {
            self.report_expected(&format!("`{symbol}`"));
        }
        matched
    }

    pub fn expect_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.eat_keyword(keyword);
        if !matched {
            self.report_expected(&format!("keyword `{keyword}`"));
        }
        matched
    }

    pub fn expect_identifier(&mut self, description: &str) -> Option<String> {
        match self.cursor.current().map(|token| &token.kind) {
            Some(TokenKind::Identifier(name)) => {
                self.cursor.advance();
                Some(name.clone())
            }
            _ => {
                self.report_expected(description);
                None
            }
        }
    }

    /// `int` | `char` | `boolean` | className
    pub fn expect_type(&mut self) -> Option<String> {
        if !self.cursor.is_type() {
            self.report_expected("a type");
            return None;
        }

        self.cursor.advance().map(|token| token.kind.value())
    }

    /// Skip to just past the next `;`, or up to a `}` or statement keyword,
    /// always consuming at least one token.
    pub fn synchronize(&mut self) {
        self.cursor.advance();

        while self.cursor.has_more_tokens()
            && !self.cursor.is_statement()
            && !self.cursor.is_symbol(Symbol::RightBrace)
        {
            if self.eat_symbol(Symbol::Semicolon) {
                return;
            }
            self.cursor.advance();
        }
    }

    // endregion
}
