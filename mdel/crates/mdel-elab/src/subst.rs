//! Substitution kernel.
//!
//! Produces a structural copy of one form under a fixed iterator tuple.
//! Identifiers have their code prefix and mode suffix rewritten; string
//! and identifier text has `<...>` references resolved against the
//! attribute tables. A reference that cannot be resolved is left exactly
//! as written - embedded C blocks are full of angle brackets that mean
//! nothing to the elaborator, and they must survive untouched.

use mdel_par::Node;
use mdel_util::{Handler, Span};

use crate::active::ActiveSet;
use crate::registry::{IterKind, Registry};
use crate::scan::{parse_angle_ref, split_angle_runs, split_mode_suffix};

/// Rewrites nodes under one fixed iterator tuple.
pub struct Substituter<'a> {
    registry: &'a Registry,
    active: &'a ActiveSet,
    handler: &'a Handler,
}

impl<'a> Substituter<'a> {
    pub fn new(registry: &'a Registry, active: &'a ActiveSet, handler: &'a Handler) -> Self {
        Self {
            registry,
            active,
            handler,
        }
    }

    /// Returns a substituted copy of `node`.
    pub fn substitute(&self, node: &Node) -> Node {
        match node {
            Node::Number(_) | Node::Bad { .. } => node.clone(),
            Node::Ident(text) => Node::Ident(self.substitute_ident(text)),
            Node::Str(text) => Node::Str(self.substitute_text(text)),
            Node::List(children) => {
                Node::List(children.iter().map(|c| self.substitute(c)).collect())
            }
            Node::Vector(children) => {
                Node::Vector(children.iter().map(|c| self.substitute(c)).collect())
            }
        }
    }

    /// Rewrites identifier text: code prefix, then mode suffix.
    fn substitute_ident(&self, text: &str) -> String {
        let (prefix, mode) = split_mode_suffix(text);

        let new_prefix = if is_bracketed(prefix) {
            self.substitute_text(prefix)
        } else if let Some(value) = self.iterator_choice(IterKind::Code, prefix) {
            value
        } else {
            self.substitute_text(prefix)
        };

        match mode {
            Some(mode) => format!("{}:{}", new_prefix, self.substitute_mode(mode)),
            None => new_prefix,
        }
    }

    /// Rewrites a mode suffix: a mode iterator's current choice, an
    /// attribute reference, or verbatim.
    fn substitute_mode(&self, mode: &str) -> String {
        if is_bracketed(mode) {
            self.resolve_run(mode)
        } else if let Some(value) = self.iterator_choice(IterKind::Mode, mode) {
            value
        } else {
            mode.to_string()
        }
    }

    /// Rewrites every `<...>` run in `text`, keeping plain chunks.
    pub fn substitute_text(&self, text: &str) -> String {
        split_angle_runs(text)
            .into_iter()
            .map(|run| self.resolve_run(run))
            .collect()
    }

    /// Current choice value of `name` if it names a `kind` iterator.
    fn iterator_choice(&self, kind: IterKind, name: &str) -> Option<String> {
        let def = self.registry.iterator(kind, name)?;
        // Discovery uses the same splitters, so a direct hit here is
        // always active; index 0 is the safe fallback regardless.
        let index = self.active.index_of(kind, name).unwrap_or(0);
        def.choices.get(index).map(|c| c.value.clone())
    }

    fn resolve_run(&self, run: &str) -> String {
        self.resolve_angle(run)
            .unwrap_or_else(|| run.to_string())
    }

    /// Resolves one `<...>` run, or `None` for identity.
    fn resolve_angle(&self, run: &str) -> Option<String> {
        let angle = parse_angle_ref(run)?;
        match angle.iterator {
            Some(iterator) => self.resolve_qualified(iterator, angle.attribute),
            None => self.resolve_unqualified(angle.attribute),
        }
    }

    /// Resolves `<ATTR>` and the `<code>`/`<mode>` builtins.
    fn resolve_unqualified(&self, attr: &str) -> Option<String> {
        let builtin = match attr {
            "code" | "CODE" => Some(IterKind::Code),
            "mode" | "MODE" => Some(IterKind::Mode),
            _ => None,
        };
        if let Some(kind) = builtin {
            let ring = self.active.ring(kind);
            if ring.len() > 1 {
                self.handler.warn(
                    format!(
                        "builtin '<{}>' is ambiguous: {} {} iterators are active",
                        attr,
                        ring.len(),
                        kind.label()
                    ),
                    Span::DUMMY,
                );
                return None;
            }
            if let Some((name, index)) = ring.first() {
                let def = self.registry.iterator(kind, name)?;
                let choice = def.choices.get(*index)?;
                let value = if attr.starts_with(|c: char| c.is_ascii_uppercase()) {
                    choice.value.to_uppercase()
                } else {
                    choice.value.to_lowercase()
                };
                return Some(value);
            }
            // No iterator of the kind is active; an ordinary attribute
            // may still carry this name.
        }

        for kind in IterKind::ALL {
            if let Some(attr_def) = self.registry.attribute(kind, attr) {
                // First active iterator whose current value the mapping
                // knows wins.
                for (name, index) in self.active.ring(kind) {
                    let Some(def) = self.registry.iterator(kind, name) else {
                        continue;
                    };
                    let Some(choice) = def.choices.get(*index) else {
                        continue;
                    };
                    if let Some(value) = attr_def.mapping.get(&choice.value) {
                        return Some(value.clone());
                    }
                }
                // Fall through: another kind may own an attribute with
                // the same name and a satisfiable mapping.
            }
        }
        None
    }

    /// Resolves `<ITOR:ATTR>`: the iterator fixes the kind and the key.
    fn resolve_qualified(&self, iterator: &str, attr: &str) -> Option<String> {
        let (kind, def) = self.registry.find_iterator(iterator)?;
        let Some(index) = self.active.index_of(kind, iterator) else {
            self.handler.warn(
                format!(
                    "iterator '{}' in '<{}:{}>' is not active in this form",
                    iterator, iterator, attr
                ),
                Span::DUMMY,
            );
            return None;
        };
        let choice = def.choices.get(index)?;
        let attr_def = self.registry.attribute(kind, attr)?;
        match attr_def.mapping.get(&choice.value) {
            Some(value) => Some(value.clone()),
            None => {
                self.handler.warn(
                    format!(
                        "attribute '{}' has no mapping for choice '{}'",
                        attr, choice.value
                    ),
                    Span::DUMMY,
                );
                None
            }
        }
    }
}

fn is_bracketed(text: &str) -> bool {
    text.len() > 2 && text.starts_with('<') && text.ends_with('>')
}
