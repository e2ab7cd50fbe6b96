mod adapters;
mod analyzer;
mod cancel;
mod cli;
mod config;
mod discovery;
mod error;
mod language;
mod linker;
mod model;
mod packages;
mod sbom;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use adapters::Dispatcher;
use cancel::CancellationToken;
use cli::{Cli, Commands, OutputFormat};
use config::EngineConfig;
use error::EngineError;
use model::{Report, Status};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            components,
            jobs,
            verbose,
            format,
        } => run_analyze(&path, &components, jobs, verbose, format),
    }
}

fn run_analyze(
    path: &std::path::Path,
    components_path: &std::path::Path,
    jobs: Option<usize>,
    verbose: bool,
    format: OutputFormat,
) -> ExitCode {
    if let Some(jobs) = jobs {
        // Only the first call in the process wins; a second `analyze` inside
        // the same process (e.g. tests) just keeps the existing pool.
        let _ = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global();
    }

    let raw = match std::fs::read_to_string(components_path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!(
                "error: failed to read component list {}: {err}",
                components_path.display()
            );
            return usage_error();
        }
    };

    let components = match sbom::parse_components(&raw) {
        Ok(components) => components,
        Err(err) => {
            eprintln!("error: {err}");
            return exit_for_engine_error(&err);
        }
    };

    let config = EngineConfig::load(path);
    let cancel = CancellationToken::new();

    if verbose {
        eprintln!("loaded {} component(s) from {}", components.len(), components_path.display());
    }

    let start = Instant::now();
    let dispatcher = Dispatcher::new();

    let results = match dispatcher.run(path, &components, &config, &cancel) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(3);
        }
    };

    let elapsed_ms = start.elapsed().as_millis();
    let report = Report::new(results, elapsed_ms, cancel.is_cancelled());

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to serialize report: {err}");
                return ExitCode::from(3);
            }
        },
        OutputFormat::Text => print_text_report(&report),
    }

    ExitCode::from(report.exit_code() as u8)
}

fn usage_error() -> ExitCode {
    ExitCode::from(2)
}

fn exit_for_engine_error(err: &EngineError) -> ExitCode {
    if err.is_input() {
        ExitCode::from(2)
    } else {
        ExitCode::from(3)
    }
}

/// Cargo-style human-readable summary, kept deliberately compact — the JSON
/// report is the canonical output for anything downstream.
fn print_text_report(report: &Report) {
    println!(
        "Analyzed {} component(s) in {}ms",
        report.summary.total, report.summary.elapsed_ms
    );
    println!(
        "  reachable: {}, imported: {}, not reachable: {}, unknown: {}",
        report.summary.reachable, report.summary.imported, report.summary.not_reachable, report.summary.unknown
    );
    if report.summary.warnings_count > 0 {
        println!("  {} warning(s)", report.summary.warnings_count);
    }
    if report.cancelled {
        println!("  run was cancelled before completion");
    }

    for result in &report.results {
        if result.status == Status::Reachable || result.status == Status::Unknown {
            println!(
                "{}@{} [{}]: {:?} ({:?})",
                result.component.name, result.component.version, result.component.ecosystem, result.status, result.confidence
            );
            for reason in &result.reasons {
                println!("    {reason}");
            }
        }
    }
}
