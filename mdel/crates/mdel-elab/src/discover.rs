//! Iterator discovery.
//!
//! Walks one top-level form and activates every iterator it references,
//! directly or through attribute qualifiers. Discovery and substitution
//! share their text splitters, so an iterator consulted while
//! substituting was necessarily activated here first.
//!
//! Activation is by name only: `<sfx>` activates nothing unless `sfx`
//! itself names an iterator, even when an attribute `sfx` exists. The
//! iterator governing an attribute is determined at substitution time,
//! so a form whose only iterator dependence hides behind an unqualified
//! attribute expands exactly once, with the attribute left verbatim.

use mdel_par::Node;

use crate::active::ActiveSet;
use crate::registry::{IterKind, Registry};
use crate::scan::{parse_angle_ref, split_angle_runs, split_mode_suffix};

/// Activates every iterator the form transitively references.
pub fn discover(node: &Node, registry: &Registry, active: &mut ActiveSet) {
    match node {
        Node::Number(_) => {}
        // Bad wrappers are diagnostic baggage, not expandable content.
        Node::Bad { .. } => {}
        Node::Str(text) => {
            for run in split_angle_runs(text) {
                activate_from_run(run, registry, active);
            }
        }
        Node::Ident(text) => {
            let (prefix, mode) = split_mode_suffix(text);
            if let Some(mode) = mode {
                if registry.iterator(IterKind::Mode, mode).is_some() {
                    active.activate(IterKind::Mode, mode);
                }
            }
            if registry.iterator(IterKind::Code, prefix).is_some() {
                active.activate(IterKind::Code, prefix);
            }
            for run in split_angle_runs(prefix) {
                activate_from_run(run, registry, active);
            }
        }
        Node::List(children) | Node::Vector(children) => {
            for child in children {
                discover(child, registry, active);
            }
        }
    }
}

/// Activates iterators named inside one `<...>` run.
///
/// Both halves of `<ITOR:ATTR>` are tried against all three iterator
/// tables; plain chunks and non-reference runs activate nothing. The
/// `<code>`/`<mode>` builtins carry no iterator name at all, so they
/// bind to the sole defined iterator of their kind - with two or more
/// defined the reference is ambiguous and activates nothing.
fn activate_from_run(run: &str, registry: &Registry, active: &mut ActiveSet) {
    let Some(angle) = parse_angle_ref(run) else {
        return;
    };
    for name in angle.iterator.into_iter().chain(Some(angle.attribute)) {
        for kind in IterKind::ALL {
            if registry.iterator(kind, name).is_some() {
                active.activate(kind, name);
            }
        }
    }

    if angle.iterator.is_none() {
        let builtin = match angle.attribute {
            "code" | "CODE" => Some(IterKind::Code),
            "mode" | "MODE" => Some(IterKind::Mode),
            _ => None,
        };
        if let Some(kind) = builtin {
            let table = registry.iterators(kind);
            if table.len() == 1 {
                if let Some((name, _)) = table.first() {
                    active.activate(kind, name);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AttrDef, IterDef};
    use mdel_par::parse_source;
    use mdel_util::Handler;

    fn test_registry() -> Registry {
        let handler = Handler::new_panicking();
        let mut registry = Registry::new();
        let defs = "(define_mode_iterator M [SI DI])\
                    (define_mode_iterator N [QI HI])\
                    (define_code_iterator any_op [plus minus])\
                    (define_int_iterator UNS [1 2])";
        for form in parse_source(defs).unwrap() {
            let def = IterDef::parse(&form, &handler).unwrap();
            let kind = match form.head_ident() {
                Some("define_mode_iterator") => IterKind::Mode,
                Some("define_code_iterator") => IterKind::Code,
                _ => IterKind::Int,
            };
            registry.define_iterator(kind, def);
        }
        let attr = parse_source("(define_mode_attr sfx [(SI \"w\") (DI \"q\")])")
            .unwrap()
            .remove(0);
        registry.define_attribute(IterKind::Mode, AttrDef::parse(&attr).unwrap());
        registry
    }

    fn discovered(source: &str) -> ActiveSet {
        let registry = test_registry();
        let form = parse_source(source).unwrap().remove(0);
        let mut active = ActiveSet::new();
        discover(&form, &registry, &mut active);
        active
    }

    #[test]
    fn test_mode_suffix_activates() {
        let active = discovered("(op:M x)");
        assert_eq!(active.index_of(IterKind::Mode, "M"), Some(0));
        assert!(active.index_of(IterKind::Mode, "N").is_none());
    }

    #[test]
    fn test_code_prefix_activates() {
        let active = discovered("(any_op:M x)");
        assert_eq!(active.index_of(IterKind::Code, "any_op"), Some(0));
        assert_eq!(active.index_of(IterKind::Mode, "M"), Some(0));
    }

    #[test]
    fn test_angle_run_in_string_activates_by_name() {
        // `M` is an iterator name; `sfx` is only an attribute.
        let active = discovered("(foo \"<M:sfx>\")");
        assert_eq!(active.index_of(IterKind::Mode, "M"), Some(0));

        let active = discovered("(foo \"mov<sfx>\")");
        assert!(active.is_empty());
    }

    #[test]
    fn test_explicit_iterator_reference_in_string() {
        let active = discovered("(foo \"<UNS>\")");
        assert_eq!(active.index_of(IterKind::Int, "UNS"), Some(0));
    }

    #[test]
    fn test_angle_run_in_identifier_prefix() {
        let active = discovered("(mov<M>_x y)");
        assert_eq!(active.index_of(IterKind::Mode, "M"), Some(0));
    }

    #[test]
    fn test_discovery_recurses_and_skips_numbers() {
        let active = discovered("(a [b (c:N 42)] \"plain\")");
        assert_eq!(active.index_of(IterKind::Mode, "N"), Some(0));
        assert!(active.index_of(IterKind::Mode, "M").is_none());
    }

    #[test]
    fn test_unknown_names_do_not_activate() {
        let active = discovered("(op:XX \"<nope>\" zz)");
        assert!(active.is_empty());
    }

    #[test]
    fn test_builtin_binds_sole_code_iterator() {
        // `any_op` is the only code iterator, so `<code>` binds to it.
        let active = discovered("(op \"do_<code>\")");
        assert_eq!(active.index_of(IterKind::Code, "any_op"), Some(0));
    }

    #[test]
    fn test_builtin_ambiguous_activates_nothing() {
        // Two mode iterators are defined; `<mode>` alone cannot choose.
        let active = discovered("(op \"x<mode>\")");
        assert!(active.index_of(IterKind::Mode, "M").is_none());
        assert!(active.index_of(IterKind::Mode, "N").is_none());
    }
}
