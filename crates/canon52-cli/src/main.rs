//! canon52 CLI - replays canonicalization and adjudication vectors, prints
//! drift anchors, and runs single inputs through the checker.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use canon52_canonical::CanonKind;
use canon52_vectors::PackPaths;
use commands::{anchors, canonicalize, decide, dump, hash, replay};

#[derive(Parser)]
#[command(name = "canon52")]
#[command(about = "Deterministic canonicalization and adjudication checker")]
struct Cli {
    /// Directory holding canon_vectors.json and adjud_vectors.json
    #[arg(long, global = true, env = "CANON52_VECTORS_DIR", default_value = "vectors")]
    vectors_dir: PathBuf,

    /// Log filter (e.g. warn, info, canon52_vectors=debug)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Canon self-test followed by the adjudication replay (default)
    All,
    /// Replay the canonicalization vectors
    #[command(visible_alias = "canon")]
    Selftest,
    /// Replay the adjudication vectors
    #[command(visible_alias = "adjud")]
    Adjudicate,
    /// Print the drift anchors
    #[command(visible_alias = "anchor")]
    Anchors {
        /// Compare against the digests listed in this document
        #[arg(long)]
        check: Option<PathBuf>,
    },
    /// Rewrite both packs in the canonical pretty layout
    Dump,
    /// Show canonical output for one input
    Canonicalize {
        /// Canonical form to apply
        #[arg(long, value_parser = parse_kind)]
        kind: CanonKind,
        /// Input file (or stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Canonicalize one input and print its SHA-256 digest
    Hash {
        /// Canonical form to apply
        #[arg(long, value_parser = parse_kind)]
        kind: CanonKind,
        /// Input file (or stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Adjudicate one request JSON object
    Decide {
        /// Request file (or stdin if not provided)
        input: Option<PathBuf>,
    },
}

fn parse_kind(s: &str) -> Result<CanonKind, String> {
    s.parse::<CanonKind>().map_err(|e| e.to_string())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let paths = PackPaths::in_dir(&cli.vectors_dir);
    tracing::debug!(canon = %paths.canon.display(), adjud = %paths.adjud.display(), "pack locations");

    let result = match cli.command.unwrap_or(Commands::All) {
        Commands::All => replay::run_all(&paths),
        Commands::Selftest => replay::run_canon(&paths),
        Commands::Adjudicate => replay::run_adjudication(&paths),
        Commands::Anchors { check } => anchors::run(&paths, check),
        Commands::Dump => dump::run(&paths),
        Commands::Canonicalize { kind, input } => canonicalize::run(kind, input),
        Commands::Hash { kind, input } => hash::run(kind, input),
        Commands::Decide { input } => decide::run(input),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
