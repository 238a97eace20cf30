//! rigger command line.
//!
//! # Usage
//!
//! ```text
//! rigger [--root <dir>] [--metadata <file>] [--offline] [-v|-vv|-q] <command>
//!
//! rigger converge [--dry-run] [--priority]   (alias: mkroot)
//! rigger status [--json]
//! rigger diff
//! rigger build [--json]
//! rigger graph
//! ```
//!
//! The binary is a thin wrapper around [`main_with`]. A dependent package
//! that registers its own config entities or builders ships a binary whose
//! `main` passes its extended [`Catalog`] instead of [`Catalog::builtin`].
//!
//! This package is the base package the dependency walk looks for: a
//! project takes part by depending on `rigger`, directly or through another
//! package that does. The types needed to write extensions are re-exported
//! here so dependents need no other rigger crate.

pub mod commands;
pub mod project;

pub use rigger_build::{BuildContext, Builder, HookError};
pub use rigger_core::{Candidate, ExtensionPoint, BASE_PACKAGE};
pub use rigger_sync::{ConfigEntity, ConvergeError, DumpError, Format, MergePolicy, ProjectContext, State};

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

use rigger_build::builder_point;
use rigger_sync::config_point;

use commands::{
    build::BuildArgs, converge::ConvergeArgs, diff::DiffArgs, graph::GraphArgs, status::StatusArgs,
};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Every extension point the CLI resolves, with all registered modules.
#[derive(Debug)]
pub struct Catalog {
    pub configs: ExtensionPoint<dyn ConfigEntity>,
    pub builders: ExtensionPoint<dyn Builder>,
}

impl Catalog {
    /// The base package's own registrations.
    pub fn builtin() -> Self {
        Self {
            configs: config_point(),
            builders: builder_point(),
        }
    }
}

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "rigger",
    version,
    about = "Converge project configuration files and build artifacts",
    long_about = None,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project root that artifacts are resolved against.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// YAML package index to use instead of running `cargo metadata`.
    #[arg(long, global = true)]
    pub metadata: Option<PathBuf>,

    /// Never touch the network; use bundled copies of remote templates.
    #[arg(long, global = true)]
    pub offline: bool,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bring every managed config file to its expected state.
    #[command(visible_alias = "mkroot")]
    Converge(ConvergeArgs),

    /// Show whether each managed config file is satisfied.
    Status(StatusArgs),

    /// Show unified diffs of what converge would write.
    Diff(DiffArgs),

    /// Run every builder and collect artifacts into their final directory.
    Build(BuildArgs),

    /// List the packages taking part, in dependency order.
    Graph(GraphArgs),
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Default log level for the verbosity flags; `RUST_LOG` overrides it.
pub fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

pub fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Execute an already parsed command line against `catalog`.
pub fn run(cli: Cli, catalog: &Catalog) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Converge(args) => args.run(&global, catalog),
        Commands::Status(args) => args.run(&global, catalog),
        Commands::Diff(args) => args.run(&global, catalog),
        Commands::Build(args) => args.run(&global, catalog),
        Commands::Graph(args) => args.run(&global),
    }
}

/// Parse the process arguments, install logging and run.
pub fn main_with(catalog: Catalog) -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose, cli.global.quiet);
    run(cli, &catalog)
}
