//! Whitespace and comment skipping.
//!
//! Between tokens the dialect allows `;` line comments, `/* ... */` block
//! comments, and one oddity: a `/` directly followed by a newline, which
//! some historical files use as a soft line continuation.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and comments before the next token.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }
            if self.cursor.starts_with("/\n") {
                self.cursor.advance_by(2);
                continue;
            }
            if self.cursor.starts_with("/*") {
                self.skip_block_comment();
                continue;
            }
            match self.cursor.current_char() {
                ';' => self.skip_line_to_newline(),
                c if c.is_whitespace() => self.cursor.bump_while(char::is_whitespace),
                _ => return,
            }
        }
    }

    /// Skips a `/* ... */` comment, cursor on the leading `/`.
    ///
    /// The scan may match a `*/` overlapping the opener, so `/*/` is a
    /// complete comment.
    pub(crate) fn skip_block_comment(&mut self) {
        self.cursor.advance();
        while !self.cursor.is_at_end() && !self.cursor.starts_with("*/") {
            self.cursor.advance();
        }
        self.cursor.advance_by(2);
    }

    /// Skips to and past the next newline.
    pub(crate) fn skip_line_to_newline(&mut self) {
        self.cursor.bump_while(|c| c != '\n');
        self.cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use crate::{tokenize, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(
            kinds("; a comment (not a list)\nfoo"),
            vec![TokenKind::Ident("foo".into())]
        );
    }

    #[test]
    fn test_line_comment_at_eof() {
        assert_eq!(kinds("; trailing"), vec![]);
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            kinds("/* skip ( me */ bar"),
            vec![TokenKind::Ident("bar".into())]
        );
    }

    #[test]
    fn test_overlapping_block_comment() {
        assert_eq!(kinds("/*/ x"), vec![TokenKind::Ident("x".into())]);
    }

    #[test]
    fn test_slash_newline_quirk() {
        assert_eq!(
            kinds("foo /\nbar"),
            vec![
                TokenKind::Ident("foo".into()),
                TokenKind::Ident("bar".into())
            ]
        );
    }

    #[test]
    fn test_comment_between_tokens() {
        assert_eq!(
            kinds("(a ; end\n b)"),
            vec![
                TokenKind::OpenParen,
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into()),
                TokenKind::CloseParen,
            ]
        );
    }
}
