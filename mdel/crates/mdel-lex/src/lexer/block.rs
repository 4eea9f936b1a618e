//! Brace-delimited code block lexing.
//!
//! A `{ ... }` block holds C code that later stages treat as opaque text.
//! The only job here is to find the matching close brace: nested braces
//! raise the depth, and braces hiding inside C strings, char literals, or
//! comments must not count. The payload is the entire braced substring,
//! braces included.

use crate::token::{Token, TokenKind};
use crate::{LexError, Lexer};

impl<'a> Lexer<'a> {
    /// Lexes a `{ ... }` block at the cursor.
    pub(crate) fn lex_brace_block(&mut self) -> Result<Token, LexError> {
        let start = self.cursor.position();
        self.cursor.advance();

        let mut depth = 1u32;
        while depth != 0 {
            if self.cursor.is_at_end() {
                return Err(self.unterminated_block());
            }

            let c = self.cursor.current_char();
            if c == '/' && self.cursor.peek_char(1) == '*' {
                self.skip_block_comment();
                continue;
            }
            if c == '/' && self.cursor.peek_char(1) == '/' {
                self.skip_line_to_newline();
                continue;
            }
            if c == '"' {
                self.skip_embedded_string('"')?;
                continue;
            }
            if c == '\'' {
                self.skip_embedded_string('\'')?;
                continue;
            }

            if c == '{' {
                depth += 1;
            } else if c == '}' {
                depth -= 1;
            }
            self.cursor.advance();
        }

        let text = self.cursor.slice(start, self.cursor.position()).to_string();
        Ok(self.make(TokenKind::Str(text)))
    }

    /// Skips a C string or char literal embedded in a brace block.
    ///
    /// Contents are opaque; only the closing delimiter and escape extents
    /// matter.
    fn skip_embedded_string(&mut self, delim: char) -> Result<(), LexError> {
        self.cursor.advance();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.unterminated_block());
            }
            let c = self.cursor.current_char();
            if c == delim {
                self.cursor.advance();
                return Ok(());
            }
            if c == '\\' {
                self.skip_escape()?;
            } else {
                self.cursor.advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_block(source: &str) -> Result<TokenKind, LexError> {
        let mut lexer = Lexer::new(source);
        lexer.next_token().map(|t| t.kind)
    }

    #[test]
    fn test_simple_block() {
        assert_eq!(
            lex_block("{ return 0; }"),
            Ok(TokenKind::Str("{ return 0; }".into()))
        );
    }

    #[test]
    fn test_nested_braces() {
        assert_eq!(
            lex_block("{braced {nested}}"),
            Ok(TokenKind::Str("{braced {nested}}".into()))
        );
    }

    #[test]
    fn test_brace_inside_string_does_not_count() {
        let source = "{ printf(\"}\"); }";
        assert_eq!(lex_block(source), Ok(TokenKind::Str(source.into())));
    }

    #[test]
    fn test_brace_inside_char_literal_does_not_count() {
        let source = "{ c == '}' }";
        assert_eq!(lex_block(source), Ok(TokenKind::Str(source.into())));
    }

    #[test]
    fn test_brace_inside_comment_does_not_count() {
        let source = "{ /* } */ x // }\n}";
        assert_eq!(lex_block(source), Ok(TokenKind::Str(source.into())));
    }

    #[test]
    fn test_escaped_quote_inside_embedded_string() {
        let source = "{ \"a\\\"}\" }";
        assert_eq!(lex_block(source), Ok(TokenKind::Str(source.into())));
    }

    #[test]
    fn test_unterminated_block() {
        assert_eq!(
            lex_block("{ {x} "),
            Err(LexError::UnterminatedBlock { line: 1, column: 1 })
        );
    }
}
