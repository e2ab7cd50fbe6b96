use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Conservative static reachability analysis for third-party dependencies.
///
/// Given a project's source and a list of declared components (plain JSON,
/// CycloneDX, or SPDX), reports per-component whether its known vulnerable
/// surface appears reachable from the project's own code.
#[derive(Parser, Debug)]
#[command(name = "reachability-engine", version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for the analysis report.
#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Structured JSON document (default) — the full `Report` shape.
    #[default]
    Json,
    /// Human-readable columnar summary.
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a project directory against a component list.
    Analyze {
        /// Path to the project root to scan.
        path: PathBuf,

        /// Path to a JSON component list (flat array, CycloneDX, or SPDX).
        #[arg(long)]
        components: PathBuf,

        /// Bound the parallel fan-out; defaults to the number of logical CPUs.
        #[arg(long)]
        jobs: Option<usize>,

        /// Print each discovered file path during analysis.
        #[arg(short, long)]
        verbose: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}
