//! Indented tree renderer for expanded forms.
//!
//! One leaf per line, containers introduced by a `list:`/`vector:`
//! header with members indented four spaces. Leaves do not write their
//! own newline; the enclosing container does, which is what puts a blank
//! line after a nested container. Downstream tooling consumes this
//! format as-is, so the quirk is load-bearing.

use std::io::{self, Write};

use mdel_par::Node;

/// Writes one node at the given indent.
pub fn dump_node(node: &Node, indent: usize, out: &mut dyn Write) -> io::Result<()> {
    match node {
        Node::Ident(text) => {
            write!(out, "{:indent$}idt: {}", "", text, indent = indent)
        }
        Node::Number(text) => {
            write!(out, "{:indent$}num: {}", "", text, indent = indent)
        }
        Node::Str(text) => {
            write!(out, "{:indent$}str: \"{}\"", "", text, indent = indent)
        }
        Node::List(children) => {
            writeln!(out, "{:indent$}list:", "", indent = indent)?;
            for child in children {
                dump_node(child, indent + 4, out)?;
                writeln!(out)?;
            }
            Ok(())
        }
        Node::Vector(children) => {
            writeln!(out, "{:indent$}vector:", "", indent = indent)?;
            for child in children {
                dump_node(child, indent + 4, out)?;
                writeln!(out)?;
            }
            Ok(())
        }
        Node::Bad { message, node } => {
            writeln!(out, "{:indent$}bad: \"{}\"", "", message, indent = indent)?;
            dump_node(node, indent + 4, out)?;
            writeln!(out)
        }
    }
}
