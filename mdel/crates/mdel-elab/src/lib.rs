//! mdel-elab - Iterator Elaboration
//!
//! ============================================================================
//! ELABORATION OVERVIEW
//! ============================================================================
//!
//! Machine descriptions use iterators as a templating layer: one pattern
//! written against an iterator expands into one concrete variant per
//! choice. This crate implements that expansion as a streaming transform
//! over parsed top-level forms:
//!
//! ```text
//! form
//!   │
//!   ├─ (include "path")          -> recurse into the file, splice output
//!   ├─ (define_*_iterator ...)   -> update registry, emit unchanged
//!   ├─ (define_*_attr ...)       -> update registry, emit unchanged
//!   └─ anything else             -> discover + expand
//!                                      │
//!                                      ├─ discovery: walk the form, activate
//!                                      │  every iterator it references
//!                                      └─ expansion: enumerate the iterator
//!                                         tuples odometer-style, emitting one
//!                                         substituted copy per tuple
//! ```
//!
//! The registry is the only state that survives between forms. Expansion
//! state (the active tuple) is local to one form, and every emitted copy
//! is a fresh tree; input nodes are never mutated.
//!
//! ============================================================================
//! ERROR POLICY
//! ============================================================================
//!
//! Lex and parse failures, unreadable include files, and include cycles
//! abort the run as [`ElabError`] values. A malformed `define_*` or
//! `include` form does not: it becomes a [`Node::Bad`] sentinel in the
//! output plus a warning on the [`Handler`], so partial results stay
//! inspectable. Unresolvable `<...>` fragments pass through verbatim by
//! design - embedded code blocks are full of angle brackets that belong
//! to C, not to the elaborator.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use mdel_lex::LexError;
use mdel_par::{Node, ParseError, Parser};
use mdel_util::{FxHashSet, Handler, Span};

pub mod active;
pub mod discover;
pub mod include;
pub mod registry;
pub mod scan;
pub mod subst;

pub use active::ActiveSet;
pub use include::{FsLoader, SourceLoader};
pub use registry::{AttrDef, Choice, IterDef, IterKind, Registry};
pub use subst::Substituter;

use discover::discover;

/// Fatal elaboration error.
///
/// Anything recoverable is reported through the [`Handler`] and a
/// [`Node::Bad`] sentinel instead.
#[derive(Debug, Error)]
pub enum ElabError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("include cycle detected at '{path}'")]
    IncludeCycle { path: PathBuf },
}

/// The elaborator: registry, include state, and the expansion loop.
///
/// # Example
///
/// ```
/// use mdel_elab::Elaborator;
/// use mdel_util::Handler;
///
/// let handler = Handler::new();
/// let mut elab = Elaborator::new(".", &handler);
/// let output = elab
///     .elaborate_source("(define_mode_iterator M [SI DI]) (op:M x)")
///     .unwrap();
///
/// let rendered: Vec<String> = output.iter().map(|n| n.to_string()).collect();
/// assert_eq!(
///     rendered,
///     vec![
///         "(define_mode_iterator M [SI DI])",
///         "(op:SI x)",
///         "(op:DI x)",
///     ]
/// );
/// ```
pub struct Elaborator<'a> {
    registry: Registry,
    working_dir: PathBuf,
    loader: Box<dyn SourceLoader>,
    /// Files on the current include descent, for cycle detection. A file
    /// may be included again once it has completed (DAG shape), just not
    /// while it is still being processed.
    include_active: FxHashSet<PathBuf>,
    handler: &'a Handler,
}

impl<'a> Elaborator<'a> {
    /// Creates an elaborator resolving includes against `working_dir` on
    /// the real filesystem.
    pub fn new(working_dir: impl Into<PathBuf>, handler: &'a Handler) -> Self {
        Self::with_loader(working_dir, handler, Box::new(FsLoader))
    }

    /// Creates an elaborator with a custom source loader.
    pub fn with_loader(
        working_dir: impl Into<PathBuf>,
        handler: &'a Handler,
        loader: Box<dyn SourceLoader>,
    ) -> Self {
        Self {
            registry: Registry::new(),
            working_dir: working_dir.into(),
            loader,
            include_active: FxHashSet::default(),
            handler,
        }
    }

    /// The accumulated iterator/attribute registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Elaborates a file by path, as given.
    ///
    /// This is the entry point for the root file; include paths resolve
    /// against the working directory instead.
    pub fn elaborate_file(&mut self, path: &Path) -> Result<Vec<Node>, ElabError> {
        self.process_file(path.to_path_buf())
    }

    /// Lexes, parses, and elaborates a source buffer.
    pub fn elaborate_source(&mut self, source: &str) -> Result<Vec<Node>, ElabError> {
        let tokens = mdel_lex::tokenize(source)?;
        let forms = Parser::new(tokens).parse_file()?;

        let mut output = Vec::new();
        for form in forms {
            output.extend(self.elaborate(form)?);
        }
        Ok(output)
    }

    /// Elaborates one top-level form into zero or more output forms.
    pub fn elaborate(&mut self, form: Node) -> Result<Vec<Node>, ElabError> {
        match form.head_ident() {
            Some("include") => self.handle_include(form),
            Some("define_mode_iterator") => Ok(vec![self.define_iterator(IterKind::Mode, form)]),
            Some("define_code_iterator") => Ok(vec![self.define_iterator(IterKind::Code, form)]),
            Some("define_int_iterator") => Ok(vec![self.define_iterator(IterKind::Int, form)]),
            Some("define_mode_attr") => Ok(vec![self.define_attribute(IterKind::Mode, form)]),
            Some("define_code_attr") => Ok(vec![self.define_attribute(IterKind::Code, form)]),
            Some("define_int_attr") => Ok(vec![self.define_attribute(IterKind::Int, form)]),
            _ => Ok(self.expand(form)),
        }
    }

    /// Registers an iterator definition and emits the form unchanged, or
    /// wraps it in a `Bad` sentinel when it is malformed.
    fn define_iterator(&mut self, kind: IterKind, form: Node) -> Node {
        match IterDef::parse(&form, self.handler) {
            Ok(def) => {
                debug!(
                    kind = kind.label(),
                    name = %def.name,
                    choices = def.choices.len(),
                    "registered iterator"
                );
                self.registry.define_iterator(kind, def);
                form
            }
            Err(message) => {
                self.handler.warn(
                    format!("malformed {} iterator definition: {}", kind.label(), message),
                    Span::DUMMY,
                );
                Node::bad(message, form)
            }
        }
    }

    /// Registers an attribute definition, same policy as iterators.
    fn define_attribute(&mut self, kind: IterKind, form: Node) -> Node {
        match AttrDef::parse(&form) {
            Ok(def) => {
                debug!(
                    kind = kind.label(),
                    name = %def.name,
                    entries = def.mapping.len(),
                    "registered attribute"
                );
                self.registry.define_attribute(kind, def);
                form
            }
            Err(message) => {
                self.handler.warn(
                    format!("malformed {} attribute definition: {}", kind.label(), message),
                    Span::DUMMY,
                );
                Node::bad(message, form)
            }
        }
    }

    /// Expands one opaque form across its discovered iterators.
    fn expand(&mut self, form: Node) -> Vec<Node> {
        let mut active = ActiveSet::new();
        discover(&form, &self.registry, &mut active);

        if active.is_empty() {
            return vec![form];
        }

        let mut output = Vec::new();
        loop {
            let subst = Substituter::new(&self.registry, &active, self.handler);
            output.push(subst.substitute(&form));
            if !active.bump(&self.registry) {
                break;
            }
        }
        debug!(copies = output.len(), "expanded form");
        output
    }

    /// Splices the elaborated contents of included files in place of the
    /// `include` form, which is consumed.
    fn handle_include(&mut self, form: Node) -> Result<Vec<Node>, ElabError> {
        enum Spec {
            One(String),
            Many(Vec<Node>),
            Malformed,
        }

        let spec = match form.children().and_then(|children| children.get(1)) {
            Some(Node::Str(path)) => Spec::One(path.clone()),
            Some(Node::List(entries)) => Spec::Many(entries.clone()),
            _ => Spec::Malformed,
        };

        match spec {
            Spec::One(path) => self.include_one(&path),
            Spec::Many(entries) => {
                let mut output = Vec::new();
                for entry in entries {
                    match entry {
                        Node::Str(path) => output.extend(self.include_one(&path)?),
                        other => {
                            self.handler
                                .warn("include path must be a string", Span::DUMMY);
                            output.push(Node::bad("include path must be a string", other));
                        }
                    }
                }
                Ok(output)
            }
            Spec::Malformed => {
                self.handler.warn("malformed include form", Span::DUMMY);
                Ok(vec![Node::bad("malformed include form", form)])
            }
        }
    }

    fn include_one(&mut self, path: &str) -> Result<Vec<Node>, ElabError> {
        let resolved = self.working_dir.join(path);
        debug!(path = %resolved.display(), "processing include");
        self.process_file(resolved)
    }

    fn process_file(&mut self, path: PathBuf) -> Result<Vec<Node>, ElabError> {
        if !self.include_active.insert(path.clone()) {
            return Err(ElabError::IncludeCycle { path });
        }
        let result = self.process_file_contents(&path);
        self.include_active.remove(&path);
        result
    }

    fn process_file_contents(&mut self, path: &Path) -> Result<Vec<Node>, ElabError> {
        let source = self.loader.load(path).map_err(|source| ElabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.elaborate_source(&source)
    }
}
