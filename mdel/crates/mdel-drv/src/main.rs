//! mdel CLI - expand iterator macros in machine-description files.
//!
//! Usage: `mdel ROOT_FILE [WORKING_DIR]`. The expanded forms go to
//! stdout as an indented tree; diagnostics go to stderr. Exit code 0 on
//! success, 1 on any lex, parse, or elaboration failure.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mdel_drv::{Config, EmitMode, Session};

/// Expand iterator macros in machine-description files.
#[derive(Parser, Debug)]
#[command(name = "mdel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Expand iterator macros in machine-description files", long_about = None)]
struct Cli {
    /// Root machine-description file.
    root_file: PathBuf,

    /// Base directory for include resolution; defaults to the root
    /// file's directory.
    working_dir: Option<PathBuf>,

    /// What to write to stdout.
    #[arg(long, value_enum, default_value_t = Emit::Expanded)]
    emit: Emit,

    /// Suppress diagnostics on stderr.
    #[arg(short, long, env = "MDEL_QUIET")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Emit {
    /// Elaborated forms as an indented tree.
    Expanded,
    /// The token stream.
    Tokens,
    /// Parsed forms before elaboration.
    Nodes,
}

impl std::fmt::Display for Emit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Emit::Expanded => "expanded",
            Emit::Tokens => "tokens",
            Emit::Nodes => "nodes",
        })
    }
}

impl From<Emit> for EmitMode {
    fn from(emit: Emit) -> Self {
        match emit {
            Emit::Expanded => EmitMode::Expanded,
            Emit::Tokens => EmitMode::Tokens,
            Emit::Nodes => EmitMode::Nodes,
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config {
        root_file: cli.root_file,
        working_dir: cli.working_dir,
        emit: cli.emit.into(),
        quiet: cli.quiet,
    };

    let mut session = Session::new(config);
    let stdout = std::io::stdout();
    if let Err(e) = session.run(&mut stdout.lock()) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
