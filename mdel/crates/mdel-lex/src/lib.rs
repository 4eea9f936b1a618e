//! mdel-lex - Lexical Analyzer for Machine-Description Sources
//!
//! ============================================================================
//! INPUT DIALECT
//! ============================================================================
//!
//! Machine-description files are written in a Lisp-like S-expression dialect
//! with a handful of quirks that predate any formal grammar:
//!
//! 1. DELIMITERS
//!    `(` `)` open and close lists, `[` `]` open and close vectors.
//!
//! 2. COMMENTS
//!    `;` comments to end of line and `/* ... */` block comments are
//!    skipped between tokens. A lone `/` directly before a newline is
//!    also treated as whitespace; some historical files contain it.
//!
//! 3. IDENTIFIERS
//!    A maximal run of letters, digits, `_`, and the marker characters
//!    `< >` `:` `*` `?`. The markers stay embedded in the identifier text;
//!    the elaborator, not the lexer, gives `<...>` and `:mode` meaning.
//!    One accommodation: a space directly after a `:` is pulled into the
//!    run and dropped from the payload, so `(match_operand: SI ...)`
//!    lexes the same as `(match_operand:SI ...)`.
//!
//! 4. NUMBERS
//!    An identifier-shaped run that is entirely decimal digits, or a
//!    valid `0x` hex literal, is a number token. Anything else that
//!    merely contains digits - `64x2mode`, `V4SF` - stays an identifier.
//!    `-` immediately followed by a digit starts a negative number.
//!
//! 5. STRINGS
//!    `"` starts a C-style string. Backslash escapes are recognized only
//!    to find their extent: the escape bytes are skipped and contribute
//!    nothing to the payload, while every unescaped byte (including raw
//!    newlines) is kept verbatim. Downstream substitution operates on
//!    the raw text, so no decoding happens anywhere in the pipeline.
//!
//! 6. BRACE BLOCKS
//!    `{` starts a C code block kept as one string token, braces
//!    included. Depth tracking honours nested braces; embedded C
//!    strings, char literals, and both C comment forms are skipped
//!    opaquely so braces inside them do not count.
//!
//! Tokens carry a [`Span`](mdel_util::Span) so later phases can point at
//! the input. All lexer failures are fatal to the current file and are
//! returned as [`LexError`] values.

use thiserror::Error;

pub mod cursor;
mod edge_cases;
mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::{is_md_ident_char, Lexer};
pub use token::{Token, TokenKind};

/// Error produced when the lexer cannot make progress.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LexError {
    /// The first character at a token boundary is not recognized.
    #[error("unexpected character '{ch}' at {line}:{column}")]
    UnexpectedChar { ch: char, line: u32, column: u32 },

    /// A `"` string ran to end of input without a closing quote.
    #[error("unterminated string literal starting at {line}:{column}")]
    UnterminatedString { line: u32, column: u32 },

    /// A `{` block ran to end of input without balancing.
    #[error("unterminated brace block starting at {line}:{column}")]
    UnterminatedBlock { line: u32, column: u32 },

    /// A backslash escape ran past the end of input.
    #[error("escape sequence runs past end of input at {line}:{column}")]
    UnterminatedEscape { line: u32, column: u32 },
}

/// Lexes an entire source buffer into a token vector.
///
/// The trailing [`TokenKind::Eof`] token is not included.
///
/// # Example
///
/// ```
/// use mdel_lex::{tokenize, TokenKind};
///
/// let tokens = tokenize("(op:SI 0x1F)").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::OpenParen,
///         TokenKind::Ident("op:SI".into()),
///         TokenKind::Number("0x1F".into()),
///         TokenKind::CloseParen,
///     ]
/// );
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        if token.kind == TokenKind::Eof {
            return Ok(tokens);
        }
        tokens.push(token);
    }
}
