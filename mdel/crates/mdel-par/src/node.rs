//! Node definitions for the parsed S-expression tree.

use std::fmt;

/// A node in the parsed tree.
///
/// Nodes are immutable after construction. Elaboration never mutates a
/// tree in place; substitution builds fresh nodes instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A bareword; the text may embed `<...>` markers and a `:mode`
    /// suffix.
    Ident(String),

    /// An integer literal, kept in its source spelling.
    Number(String),

    /// A string; either escape-stripped `"..."` content or a `{...}`
    /// block kept verbatim, braces included.
    Str(String),

    /// An ordered sequence formed by parentheses.
    List(Vec<Node>),

    /// An ordered sequence formed by square brackets.
    Vector(Vec<Node>),

    /// Elaboration error sentinel wrapping the offending form.
    Bad {
        message: String,
        node: Box<Node>,
    },
}

impl Node {
    /// Returns the head identifier of a list form, if it has one.
    ///
    /// This is how the elaborator recognizes `include` and the
    /// `define_*` family; every other head is opaque.
    pub fn head_ident(&self) -> Option<&str> {
        match self {
            Node::List(children) => match children.first() {
                Some(Node::Ident(text)) => Some(text),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the payload text of a leaf node.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Ident(text) | Node::Number(text) | Node::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the children of a list or vector node.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::List(children) | Node::Vector(children) => Some(children),
            _ => None,
        }
    }

    /// Wraps a form in a [`Node::Bad`] sentinel.
    pub fn bad(message: impl Into<String>, node: Node) -> Node {
        Node::Bad {
            message: message.into(),
            node: Box::new(node),
        }
    }
}

/// Compact single-line S-expression rendering, used by tests and the
/// `--emit nodes` mode. The pretty multi-line dump lives in the driver.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_children(f: &mut fmt::Formatter<'_>, children: &[Node]) -> fmt::Result {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", child)?;
            }
            Ok(())
        }

        match self {
            Node::Ident(text) | Node::Number(text) => write!(f, "{}", text),
            Node::Str(text) => write!(f, "\"{}\"", text),
            Node::List(children) => {
                write!(f, "(")?;
                write_children(f, children)?;
                write!(f, ")")
            }
            Node::Vector(children) => {
                write!(f, "[")?;
                write_children(f, children)?;
                write!(f, "]")
            }
            Node::Bad { message, node } => write!(f, "(bad \"{}\" {})", message, node),
        }
    }
}
