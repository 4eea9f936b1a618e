//! Iterator and attribute registry.
//!
//! Six ordered tables: iterators and attributes, each in the three
//! independent namespaces (mode, code, int). Definition order is
//! semantic - it fixes both expansion order within an iterator and the
//! activation order that drives the odometer - so every table is an
//! `IndexMap`. Redefining a name overwrites the entry but keeps its
//! original position.

use mdel_par::Node;
use mdel_util::{Handler, IndexMap, Span};
use tracing::trace;

/// The three independent iterator namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IterKind {
    /// Substitutes `:mode` suffixes.
    Mode,
    /// Substitutes identifier prefixes.
    Code,
    /// Substitutes through attribute values only.
    Int,
}

impl IterKind {
    /// All kinds, in the order tables are searched and rings advanced.
    pub const ALL: [IterKind; 3] = [IterKind::Mode, IterKind::Code, IterKind::Int];

    /// Lowercase label, used in messages and definitions.
    pub fn label(self) -> &'static str {
        match self {
            IterKind::Mode => "mode",
            IterKind::Code => "code",
            IterKind::Int => "int",
        }
    }
}

/// One choice of an iterator: a substitution value and an optional side
/// condition. The condition is carried along for downstream consumers
/// and never interpreted here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub condition: String,
}

/// A defined iterator: an ordered, non-empty choice list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterDef {
    pub name: String,
    pub choices: Vec<Choice>,
}

/// A defined attribute: an ordered map from choice value to substitution
/// string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrDef {
    pub name: String,
    pub mapping: IndexMap<String, String>,
}

impl IterDef {
    /// Parses `(define_*_iterator NAME [CHOICES...])`.
    ///
    /// Each choice is a bare leaf (empty condition) or a 2-element
    /// list/vector `(VALUE "cond")`. A condition wrapped in one extra
    /// layer of parentheses is unwrapped with a warning; the quirk
    /// appears in real machine descriptions. Returns the message for a
    /// `Bad` node when the form does not have that shape.
    pub fn parse(form: &Node, handler: &Handler) -> Result<IterDef, String> {
        let children = form
            .children()
            .ok_or_else(|| "definition is not a list".to_string())?;
        if children.len() < 3 {
            return Err("expected a name and a choice vector".to_string());
        }

        let name = match &children[1] {
            Node::Ident(name) => name.clone(),
            _ => return Err("iterator name must be an identifier".to_string()),
        };
        let members = children[2]
            .children()
            .ok_or_else(|| "expected a choice vector".to_string())?;

        let mut choices = Vec::new();
        for member in members {
            choices.push(Choice::parse(member, handler)?);
        }
        if choices.is_empty() {
            return Err(format!("iterator '{}' has no choices", name));
        }

        Ok(IterDef { name, choices })
    }
}

impl Choice {
    fn parse(member: &Node, handler: &Handler) -> Result<Choice, String> {
        match member {
            Node::List(items) | Node::Vector(items) => {
                let value = items
                    .first()
                    .and_then(Node::text)
                    .ok_or_else(|| "choice value must be a leaf".to_string())?;
                let condition = match items.get(1) {
                    Some(node) => strip_condition(node, handler)?,
                    None => return Err(format!("choice '{}' is missing its condition", value)),
                };
                Ok(Choice {
                    value: value.to_string(),
                    condition,
                })
            }
            _ => {
                let value = member
                    .text()
                    .ok_or_else(|| "choice must be a leaf or a 2-list".to_string())?;
                Ok(Choice {
                    value: value.to_string(),
                    condition: String::new(),
                })
            }
        }
    }
}

/// Unwraps a condition that arrives wrapped in an extra single-element
/// list, as in `(V8BF ("TARGET_BF16_SIMD"))`.
fn strip_condition(node: &Node, handler: &Handler) -> Result<String, String> {
    match node {
        Node::List(items) | Node::Vector(items) => {
            if items.len() != 1 {
                return Err("condition must be a single string".to_string());
            }
            handler.warn(
                "choice condition wrapped in extra parentheses",
                Span::DUMMY,
            );
            items[0]
                .text()
                .map(str::to_string)
                .ok_or_else(|| "condition must be a string".to_string())
        }
        _ => node
            .text()
            .map(str::to_string)
            .ok_or_else(|| "condition must be a string".to_string()),
    }
}

impl AttrDef {
    /// Parses `(define_*_attr NAME [PAIRS...])`.
    ///
    /// Each pair is a bare identifier (empty value) or a 2-element list
    /// `(KEY "value")`. Returns the message for a `Bad` node when the
    /// form does not have that shape.
    pub fn parse(form: &Node) -> Result<AttrDef, String> {
        let children = form
            .children()
            .ok_or_else(|| "definition is not a list".to_string())?;
        if children.len() < 3 {
            return Err("expected a name and a mapping vector".to_string());
        }

        let name = match &children[1] {
            Node::Ident(name) => name.clone(),
            _ => return Err("attribute name must be an identifier".to_string()),
        };
        let pairs = children[2]
            .children()
            .ok_or_else(|| "expected a mapping vector".to_string())?;

        let mut mapping = IndexMap::new();
        for pair in pairs {
            match pair {
                Node::List(items) => {
                    let key = items
                        .first()
                        .and_then(Node::text)
                        .ok_or_else(|| "mapping key must be a leaf".to_string())?;
                    let value = items
                        .get(1)
                        .and_then(Node::text)
                        .ok_or_else(|| format!("mapping for '{}' must be a string", key))?;
                    mapping.insert(key.to_string(), value.to_string());
                }
                Node::Ident(key) => {
                    mapping.insert(key.clone(), String::new());
                }
                _ => return Err("mapping entry must be an identifier or a 2-list".to_string()),
            }
        }

        Ok(AttrDef { name, mapping })
    }
}

/// The six symbol tables accumulated while elaborating a file set.
#[derive(Default)]
pub struct Registry {
    mode_iterators: IndexMap<String, IterDef>,
    code_iterators: IndexMap<String, IterDef>,
    int_iterators: IndexMap<String, IterDef>,
    mode_attributes: IndexMap<String, AttrDef>,
    code_attributes: IndexMap<String, AttrDef>,
    int_attributes: IndexMap<String, AttrDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The iterator table for one kind.
    pub fn iterators(&self, kind: IterKind) -> &IndexMap<String, IterDef> {
        match kind {
            IterKind::Mode => &self.mode_iterators,
            IterKind::Code => &self.code_iterators,
            IterKind::Int => &self.int_iterators,
        }
    }

    /// The attribute table for one kind.
    pub fn attributes(&self, kind: IterKind) -> &IndexMap<String, AttrDef> {
        match kind {
            IterKind::Mode => &self.mode_attributes,
            IterKind::Code => &self.code_attributes,
            IterKind::Int => &self.int_attributes,
        }
    }

    /// Registers an iterator; a later definition overwrites the earlier.
    pub fn define_iterator(&mut self, kind: IterKind, def: IterDef) {
        let table = match kind {
            IterKind::Mode => &mut self.mode_iterators,
            IterKind::Code => &mut self.code_iterators,
            IterKind::Int => &mut self.int_iterators,
        };
        table.insert(def.name.clone(), def);
    }

    /// Registers an attribute; a later definition overwrites the earlier.
    pub fn define_attribute(&mut self, kind: IterKind, def: AttrDef) {
        let table = match kind {
            IterKind::Mode => &mut self.mode_attributes,
            IterKind::Code => &mut self.code_attributes,
            IterKind::Int => &mut self.int_attributes,
        };
        table.insert(def.name.clone(), def);
    }

    /// Looks up an iterator by kind and name.
    pub fn iterator(&self, kind: IterKind, name: &str) -> Option<&IterDef> {
        self.iterators(kind).get(name)
    }

    /// Looks up an attribute by kind and name.
    pub fn attribute(&self, kind: IterKind, name: &str) -> Option<&AttrDef> {
        self.attributes(kind).get(name)
    }

    /// Finds an iterator by name alone, searching mode, code, then int.
    pub fn find_iterator(&self, name: &str) -> Option<(IterKind, &IterDef)> {
        IterKind::ALL
            .iter()
            .find_map(|&kind| self.iterator(kind, name).map(|def| (kind, def)))
    }

    /// Logs every table at trace level.
    pub fn trace_dump(&self) {
        for kind in IterKind::ALL {
            for (name, def) in self.iterators(kind) {
                let choices: Vec<&str> = def.choices.iter().map(|c| c.value.as_str()).collect();
                trace!(kind = kind.label(), name = %name, ?choices, "iterator");
            }
            for (name, def) in self.attributes(kind) {
                trace!(
                    kind = kind.label(),
                    name = %name,
                    entries = def.mapping.len(),
                    "attribute"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdel_par::parse_source;

    fn first_form(source: &str) -> Node {
        parse_source(source).unwrap().remove(0)
    }

    #[test]
    fn test_parse_iterator_bare_choices() {
        let handler = Handler::new_panicking();
        let form = first_form("(define_mode_iterator GPI [SI DI])");
        let def = IterDef::parse(&form, &handler).unwrap();

        assert_eq!(def.name, "GPI");
        assert_eq!(
            def.choices,
            vec![
                Choice {
                    value: "SI".into(),
                    condition: "".into()
                },
                Choice {
                    value: "DI".into(),
                    condition: "".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_iterator_with_conditions() {
        let handler = Handler::new_panicking();
        let form = first_form("(define_mode_iterator GPI [SI (DI \"TARGET_64BIT\")])");
        let def = IterDef::parse(&form, &handler).unwrap();

        assert_eq!(def.choices[1].value, "DI");
        assert_eq!(def.choices[1].condition, "TARGET_64BIT");
    }

    #[test]
    fn test_parse_iterator_wrapped_condition_warns() {
        let handler = Handler::new();
        let form = first_form("(define_mode_iterator V [(V8BF (\"TARGET_BF16_SIMD\"))])");
        let def = IterDef::parse(&form, &handler).unwrap();

        assert_eq!(def.choices[0].condition, "TARGET_BF16_SIMD");
        assert_eq!(handler.warning_count(), 1);
    }

    #[test]
    fn test_parse_iterator_numeric_choices() {
        let handler = Handler::new_panicking();
        let form = first_form("(define_int_iterator UNSPEC [1 2 3])");
        let def = IterDef::parse(&form, &handler).unwrap();
        assert_eq!(def.choices.len(), 3);
        assert_eq!(def.choices[0].value, "1");
    }

    #[test]
    fn test_parse_iterator_malformed() {
        let handler = Handler::new();
        for source in [
            "(define_mode_iterator)",
            "(define_mode_iterator GPI)",
            "(define_mode_iterator \"GPI\" [SI])",
            "(define_mode_iterator GPI [])",
            "(define_mode_iterator GPI [(SI)])",
        ] {
            let form = first_form(source);
            assert!(IterDef::parse(&form, &handler).is_err(), "{}", source);
        }
    }

    #[test]
    fn test_parse_attribute() {
        let form = first_form("(define_mode_attr sfx [(SI \"w\") (DI \"q\") bare])");
        let def = AttrDef::parse(&form).unwrap();

        assert_eq!(def.name, "sfx");
        assert_eq!(def.mapping.get("SI").map(String::as_str), Some("w"));
        assert_eq!(def.mapping.get("DI").map(String::as_str), Some("q"));
        assert_eq!(def.mapping.get("bare").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_attribute_preserves_order() {
        let form = first_form("(define_mode_attr sfx [(DI \"q\") (SI \"w\")])");
        let def = AttrDef::parse(&form).unwrap();
        let keys: Vec<&String> = def.mapping.keys().collect();
        assert_eq!(keys, ["DI", "SI"]);
    }

    #[test]
    fn test_redefinition_overwrites() {
        let handler = Handler::new_panicking();
        let mut registry = Registry::new();
        for source in [
            "(define_mode_iterator GPI [SI])",
            "(define_mode_iterator GPI [SI DI])",
        ] {
            let form = first_form(source);
            registry.define_iterator(IterKind::Mode, IterDef::parse(&form, &handler).unwrap());
        }

        let def = registry.iterator(IterKind::Mode, "GPI").unwrap();
        assert_eq!(def.choices.len(), 2);
        assert_eq!(registry.iterators(IterKind::Mode).len(), 1);
    }

    #[test]
    fn test_find_iterator_search_order() {
        let handler = Handler::new_panicking();
        let mut registry = Registry::new();
        let form = first_form("(define_code_iterator any_op [plus minus])");
        registry.define_iterator(IterKind::Code, IterDef::parse(&form, &handler).unwrap());

        let (kind, def) = registry.find_iterator("any_op").unwrap();
        assert_eq!(kind, IterKind::Code);
        assert_eq!(def.choices[0].value, "plus");
        assert!(registry.find_iterator("missing").is_none());
    }
}
