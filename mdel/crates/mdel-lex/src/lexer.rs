//! Main lexer implementation.
//!
//! The lexer dispatches on the first character of each token, with one
//! twist inherited from the dialect: an identifier-shaped run is scanned
//! first and promoted to a number only when the whole run is numeric.
//! `64x2mode` and `0x1Fg` are identifiers; `0x1F` and `123` are numbers.

use mdel_util::Span;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::LexError;

mod block;
mod comment;
mod ident;
mod number;
mod string;

pub use self::ident::is_md_ident_char;

use self::number::{is_decimal_literal, is_hex_literal};

/// The machine-description lexer.
///
/// Produces one token per call to [`next_token`](Lexer::next_token),
/// ending with [`TokenKind::Eof`]. All errors are fatal; there is no
/// recovery token.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Start byte position of the current token.
    token_start: usize,

    /// Start line of the current token.
    token_start_line: u32,

    /// Start column of the current token.
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(self.make(TokenKind::Eof));
        }

        // Number-or-identifier is decided on the whole run, not the first
        // character.
        let run_end = self.ident_run_end();
        if run_end > self.cursor.position() {
            let run = self.cursor.slice(self.cursor.position(), run_end);
            if is_decimal_literal(run) || is_hex_literal(run) {
                return self.lex_number();
            }
            return self.lex_identifier(run_end);
        }

        match self.cursor.current_char() {
            '(' => self.single(TokenKind::OpenParen),
            ')' => self.single(TokenKind::CloseParen),
            '[' => self.single(TokenKind::OpenBracket),
            ']' => self.single(TokenKind::CloseBracket),
            '"' => self.lex_string(),
            '{' => self.lex_brace_block(),
            '-' if self.cursor.peek_char(1).is_ascii_digit() => self.lex_negative_number(),
            c => Err(LexError::UnexpectedChar {
                ch: c,
                line: self.token_start_line,
                column: self.token_start_column,
            }),
        }
    }

    /// Consumes one character and produces a token of the given kind.
    fn single(&mut self, kind: TokenKind) -> Result<Token, LexError> {
        self.cursor.advance();
        Ok(self.make(kind))
    }

    /// Builds a token spanning from the recorded start to the cursor.
    fn make(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(
                self.token_start,
                self.cursor.position(),
                self.token_start_line,
                self.token_start_column,
            ),
        )
    }

    fn unterminated_string(&self) -> LexError {
        LexError::UnterminatedString {
            line: self.token_start_line,
            column: self.token_start_column,
        }
    }

    fn unterminated_block(&self) -> LexError {
        LexError::UnterminatedBlock {
            line: self.token_start_line,
            column: self.token_start_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        crate::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            kinds("()[]"),
            vec![
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::OpenBracket,
                TokenKind::CloseBracket,
            ]
        );
    }

    #[test]
    fn test_eof_token() {
        let mut lexer = Lexer::new("  ");
        assert!(lexer.next_token().unwrap().is_eof());
        assert!(lexer.next_token().unwrap().is_eof());
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("  @");
        assert_eq!(
            lexer.next_token(),
            Err(LexError::UnexpectedChar {
                ch: '@',
                line: 1,
                column: 3
            })
        );
    }

    #[test]
    fn test_minus_without_digit_is_error() {
        let mut lexer = Lexer::new("-x");
        assert!(matches!(
            lexer.next_token(),
            Err(LexError::UnexpectedChar { ch: '-', .. })
        ));
    }

    #[test]
    fn test_token_spans() {
        let tokens = crate::tokenize("(ab\n cd)").unwrap();
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.column, 2);
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 2);
    }
}
