//! mdel-par - S-expression Parser
//!
//! ============================================================================
//! GRAMMAR
//! ============================================================================
//!
//! The token stream produced by mdel-lex follows a small grammar:
//!
//! ```text
//! file    = { list } ;
//! list    = "(" { primary } ")" ;
//! vector  = "[" { primary } "]" ;
//! primary = list | vector | IDENT | NUMBER | STRING ;
//! ```
//!
//! Only lists are accepted at file scope; a stray atom or vector at top
//! level is a structural error. Inside a form anything nests freely -
//! iterator definitions put vectors inside lists, instruction patterns
//! put lists inside vectors.
//!
//! The parser is a plain recursive descent over the token vector. There
//! is no error recovery: machine descriptions are generated-and-checked
//! artifacts, and a structural error means the rest of the file cannot be
//! trusted, so the first failure aborts the file.

use thiserror::Error;

use mdel_lex::{Token, TokenKind};

mod node;

pub use node::Node;

/// Error produced when the token stream does not match the grammar.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A token that cannot start a primary, or a stray closer.
    #[error("unexpected {found} at {line}:{column}")]
    UnexpectedToken {
        found: String,
        line: u32,
        column: u32,
    },

    /// Input ended inside an unclosed list or vector.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    /// A top-level form that is not a list.
    #[error("expected a list at top level, found {found} at {line}:{column}")]
    ExpectedList {
        found: String,
        line: u32,
        column: u32,
    },
}

/// Recursive descent parser over a lexed token vector.
///
/// # Example
///
/// ```
/// use mdel_lex::tokenize;
/// use mdel_par::Parser;
///
/// let tokens = tokenize("(op:SI [1 2] \"mov\")").unwrap();
/// let forms = Parser::new(tokens).parse_file().unwrap();
/// assert_eq!(forms.len(), 1);
/// assert_eq!(forms[0].to_string(), "(op:SI [1 2] \"mov\")");
/// ```
pub struct Parser {
    /// Token stream from the lexer.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the whole file: a sequence of top-level lists.
    pub fn parse_file(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut forms = Vec::new();
        while !self.is_at_end() {
            forms.push(self.parse_toplevel()?);
        }
        Ok(forms)
    }

    /// Parses one top-level form, which must be a list.
    pub fn parse_toplevel(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::OpenParen => self.parse_list(),
            Some(token) => Err(ParseError::ExpectedList {
                found: token.kind.describe().to_string(),
                line: token.span.line,
                column: token.span.column,
            }),
            None => Err(ParseError::UnexpectedEof { expected: "'('" }),
        }
    }

    /// Parses a single primary: list, vector, or leaf.
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = match self.peek() {
            Some(token) => token,
            None => return Err(ParseError::UnexpectedEof { expected: "a form" }),
        };

        match &token.kind {
            TokenKind::OpenParen => self.parse_list(),
            TokenKind::OpenBracket => self.parse_vector(),
            TokenKind::Ident(text) => {
                let node = Node::Ident(text.clone());
                self.advance();
                Ok(node)
            }
            TokenKind::Number(text) => {
                let node = Node::Number(text.clone());
                self.advance();
                Ok(node)
            }
            TokenKind::Str(text) => {
                let node = Node::Str(text.clone());
                self.advance();
                Ok(node)
            }
            kind => Err(ParseError::UnexpectedToken {
                found: kind.describe().to_string(),
                line: token.span.line,
                column: token.span.column,
            }),
        }
    }

    fn parse_list(&mut self) -> Result<Node, ParseError> {
        self.advance();

        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some(token) if token.kind == TokenKind::CloseParen => {
                    self.advance();
                    return Ok(Node::List(children));
                }
                Some(_) => children.push(self.parse_primary()?),
                None => return Err(ParseError::UnexpectedEof { expected: "')'" }),
            }
        }
    }

    fn parse_vector(&mut self) -> Result<Node, ParseError> {
        self.advance();

        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some(token) if token.kind == TokenKind::CloseBracket => {
                    self.advance();
                    return Ok(Node::Vector(children));
                }
                Some(_) => children.push(self.parse_primary()?),
                None => return Err(ParseError::UnexpectedEof { expected: "']'" }),
            }
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

/// Lexes and parses a source buffer in one step.
///
/// Convenience for tests and callers that do not need the token stream.
pub fn parse_source(source: &str) -> Result<Vec<Node>, SourceError> {
    let tokens = mdel_lex::tokenize(source)?;
    Ok(Parser::new(tokens).parse_file()?)
}

/// Error from [`parse_source`]: either phase can fail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error(transparent)]
    Lex(#[from] mdel_lex::LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
