//! C string lexing.
//!
//! The payload keeps unescaped source bytes verbatim and drops escape
//! sequences entirely. Substitution later operates on this raw text, and
//! the dump prints it back out unchanged, so decoding escapes would only
//! corrupt the round trip.

use crate::token::{Token, TokenKind};
use crate::{LexError, Lexer};

impl<'a> Lexer<'a> {
    /// Lexes a `"` delimited string.
    pub(crate) fn lex_string(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();

        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.unterminated_string());
            }

            let c = self.cursor.current_char();
            if c == '"' {
                self.cursor.advance();
                break;
            }
            if c == '\\' {
                self.skip_escape()?;
                continue;
            }

            content.push(c);
            self.cursor.advance();
        }

        Ok(self.make(TokenKind::Str(content)))
    }

    /// Skips one backslash escape without decoding it.
    ///
    /// Extents follow C conventions: `\x` plus a maximal hex-digit run,
    /// `\u` plus 4 hex digits, `\U` plus 8, `\<digit>` plus 2 more
    /// characters, and 2 bytes for everything else. Running past the end
    /// of input is an error.
    pub(crate) fn skip_escape(&mut self) -> Result<(), LexError> {
        let err = LexError::UnterminatedEscape {
            line: self.cursor.line(),
            column: self.cursor.column(),
        };

        match self.cursor.peek_char(1) {
            'x' => {
                self.cursor.advance_by(2);
                self.cursor.bump_while(|c| c.is_ascii_hexdigit());
            }
            'u' => self.cursor.advance_by(6),
            'U' => self.cursor.advance_by(10),
            d if d.is_ascii_digit() => self.cursor.advance_by(4),
            _ => self.cursor.advance_by(2),
        }

        if self.cursor.is_at_end() {
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_str(source: &str) -> Result<TokenKind, LexError> {
        let mut lexer = Lexer::new(source);
        lexer.next_token().map(|t| t.kind)
    }

    #[test]
    fn test_simple_string() {
        assert_eq!(lex_str(r#""movw""#), Ok(TokenKind::Str("movw".into())));
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(lex_str(r#""""#), Ok(TokenKind::Str("".into())));
    }

    #[test]
    fn test_escape_is_dropped() {
        // Two source bytes `\` `n` vanish from the payload.
        assert_eq!(lex_str("\"a\\nb\""), Ok(TokenKind::Str("ab".into())));
    }

    #[test]
    fn test_raw_newline_is_kept() {
        assert_eq!(lex_str("\"hi\n\""), Ok(TokenKind::Str("hi\n".into())));
    }

    #[test]
    fn test_hex_escape_consumes_digit_run() {
        // `\x41b` is all hex, `g` is not.
        assert_eq!(lex_str("\"\\x41bg\""), Ok(TokenKind::Str("g".into())));
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(lex_str("\"\\u0041z\""), Ok(TokenKind::Str("z".into())));
        assert_eq!(lex_str("\"\\U00000041z\""), Ok(TokenKind::Str("z".into())));
    }

    #[test]
    fn test_octal_escape() {
        assert_eq!(lex_str("\"\\101z\""), Ok(TokenKind::Str("z".into())));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            lex_str("\"abc"),
            Err(LexError::UnterminatedString { line: 1, column: 1 })
        );
    }

    #[test]
    fn test_escape_at_end_of_input() {
        assert!(matches!(
            lex_str("\"ab\\"),
            Err(LexError::UnterminatedEscape { .. })
        ));
    }
}
