//! Number literal lexing.
//!
//! Numbers keep their source spelling; nothing downstream does arithmetic
//! on them, so there is no reason to parse the value out.

use crate::token::{Token, TokenKind};
use crate::{LexError, Lexer};

/// Returns true if `run` is a plain decimal literal.
pub(crate) fn is_decimal_literal(run: &str) -> bool {
    !run.is_empty() && run.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if `run` is a `0x` hex literal with at least one digit.
pub(crate) fn is_hex_literal(run: &str) -> bool {
    run.len() > 2 && run.starts_with("0x") && run[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

impl<'a> Lexer<'a> {
    /// Lexes a decimal or hex number at the cursor.
    ///
    /// Only called once the dispatch has established that the run is
    /// numeric, so the scan cannot fail.
    pub(crate) fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.cursor.position();
        self.scan_number_digits();
        let text = self.cursor.slice(start, self.cursor.position()).to_string();
        Ok(self.make(TokenKind::Number(text)))
    }

    /// Lexes a `-` immediately followed by a digit.
    pub(crate) fn lex_negative_number(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let start = self.cursor.position();
        self.scan_number_digits();
        let text = format!("-{}", self.cursor.slice(start, self.cursor.position()));
        Ok(self.make(TokenKind::Number(text)))
    }

    fn scan_number_digits(&mut self) {
        if self.cursor.starts_with("0x") {
            self.cursor.advance_by(2);
            self.cursor.bump_while(|c| c.is_ascii_hexdigit());
        } else {
            self.cursor.bump_while(|c| c.is_ascii_digit());
        }
    }
}
