//! mdel-drv - Pipeline Driver
//!
//! ============================================================================
//! DRIVER OVERVIEW
//! ============================================================================
//!
//! The driver owns one run of the tool:
//!
//! 1. CONFIGURATION
//!    A [`Config`] names the root file, the include working directory
//!    (defaulting to the root file's directory), and what to emit.
//!
//! 2. PIPELINE ORCHESTRATION
//!    ```text
//!    Root file (.md)
//!         │
//!         ▼
//!    [Lexer]  ──▶ tokens          (--emit tokens stops here)
//!         │
//!         ▼
//!    [Parser] ──▶ node trees      (--emit nodes stops here)
//!         │
//!         ▼
//!    [Elaborator] ──▶ expanded forms
//!         │
//!         ▼
//!    [Dump] ──▶ indented tree on stdout
//!    ```
//!
//! 3. DIAGNOSTICS
//!    Fatal errors surface as `anyhow` errors and a non-zero exit.
//!    Recoverable findings collect in the [`Handler`] during the run and
//!    print to stderr afterwards; error-level findings fail the run once
//!    output has been flushed.
//!
//! The tool is a pure transducer; nothing is persisted between runs.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use mdel_elab::Elaborator;
use mdel_par::Parser;
use mdel_util::Handler;

pub mod dump;

pub use dump::dump_node;

/// What the driver should emit on stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmitMode {
    /// Elaborated forms rendered as an indented tree.
    #[default]
    Expanded,
    /// The token stream, one token per line.
    Tokens,
    /// Parsed forms before elaboration, one per line.
    Nodes,
}

/// Configuration for one run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root machine-description file.
    pub root_file: PathBuf,

    /// Base directory for include resolution; `None` means the root
    /// file's directory.
    pub working_dir: Option<PathBuf>,

    /// What to emit.
    pub emit: EmitMode,

    /// Suppress diagnostic output on stderr.
    pub quiet: bool,
}

impl Config {
    /// Creates a default-mode config for a root file.
    pub fn new(root_file: impl Into<PathBuf>) -> Self {
        Self {
            root_file: root_file.into(),
            working_dir: None,
            emit: EmitMode::Expanded,
            quiet: false,
        }
    }

    /// The effective include working directory.
    pub fn working_dir(&self) -> PathBuf {
        match &self.working_dir {
            Some(dir) => dir.clone(),
            None => self
                .root_file
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// One invocation of the tool.
pub struct Session {
    pub config: Config,
    pub handler: Handler,
}

impl Session {
    /// Creates a session for the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            handler: Handler::new(),
        }
    }

    /// Runs the pipeline, writing output to `out`.
    ///
    /// Returns an error for fatal failures (unreadable file, lex/parse
    /// error, include cycle) and when any error-level diagnostic was
    /// collected during the run.
    pub fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        match self.config.emit {
            EmitMode::Tokens => self.emit_tokens(out)?,
            EmitMode::Nodes => self.emit_nodes(out)?,
            EmitMode::Expanded => self.emit_expanded(out)?,
        }
        self.report_diagnostics()
    }

    fn emit_tokens(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let source = self.read_root()?;
        let tokens = mdel_lex::tokenize(&source)?;
        for token in tokens {
            writeln!(out, "{}", token.kind)?;
        }
        Ok(())
    }

    fn emit_nodes(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let source = self.read_root()?;
        let tokens = mdel_lex::tokenize(&source)?;
        let forms = Parser::new(tokens).parse_file()?;
        for form in forms {
            writeln!(out, "{}", form)?;
        }
        Ok(())
    }

    fn emit_expanded(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let working_dir = self.config.working_dir();
        debug!(
            root = %self.config.root_file.display(),
            working_dir = %working_dir.display(),
            "starting elaboration"
        );

        let mut elaborator = Elaborator::new(working_dir, &self.handler);
        let output = elaborator.elaborate_file(&self.config.root_file)?;
        elaborator.registry().trace_dump();

        for node in &output {
            dump_node(node, 0, out)?;
        }
        Ok(())
    }

    fn read_root(&self) -> anyhow::Result<String> {
        std::fs::read_to_string(&self.config.root_file)
            .with_context(|| format!("cannot read '{}'", self.config.root_file.display()))
    }

    /// Prints collected diagnostics and fails on error-level ones.
    fn report_diagnostics(&self) -> anyhow::Result<()> {
        let diagnostics = self.handler.take();
        let errors = diagnostics
            .iter()
            .filter(|d| d.level == mdel_util::Level::Error)
            .count();

        if !self.config.quiet {
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic);
            }
        }

        if errors > 0 {
            anyhow::bail!("{} error(s) during elaboration", errors);
        }
        Ok(())
    }
}
