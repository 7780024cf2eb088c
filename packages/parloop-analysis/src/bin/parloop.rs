//! parloop CLI
//!
//! Decides whether the iterations of the top-level `for` loop in a Python
//! file can run in parallel.
//!
//! # Usage
//!
//! ```bash
//! parloop loop.py
//! parloop loop.py --explain
//! parloop loop.py --format json --preset thorough
//! RUST_LOG=parloop_analysis=debug parloop loop.py
//! ```
//!
//! # Exit codes
//!
//! - `0`: both verdicts decided
//! - `1`: extraction, configuration, IO, or solver error
//! - `3`: at least one verdict indeterminate

use clap::{Parser, ValueEnum};
use parloop_analysis::{
    analyze_file, AliasPolicy, AnalysisConfig, ConflictResult, ConflictVerdict, Preset, SolverKind,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const EXIT_ERROR: u8 = 1;
const EXIT_INDETERMINATE: u8 = 3;

#[derive(Parser)]
#[command(name = "parloop")]
#[command(about = "Loop parallelization conflict analysis", long_about = None)]
struct Cli {
    /// Python source file with one top-level `for ... in range(...)` loop
    file: PathBuf,

    /// Preset for solver limits (fast, balanced, thorough)
    #[arg(long, default_value = "balanced")]
    preset: String,

    /// Solver backend (enumerative, z3)
    #[arg(long)]
    solver: Option<String>,

    /// Z3 timeout per query in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Enumerative solver budget per query
    #[arg(long)]
    max_assignments: Option<u64>,

    /// Which access pairs are compared (may-alias, distinct-arrays)
    #[arg(long)]
    alias_policy: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the conflicting accesses and iteration values
    #[arg(long)]
    explain: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match analyze_file(&cli.file, &config) {
        Ok(result) => {
            match cli.format {
                OutputFormat::Text => print_text(&result, cli.explain),
                OutputFormat::Json => print_json(&cli, &result),
            }
            if result.is_indeterminate() {
                ExitCode::from(EXIT_INDETERMINATE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) if e.is_extraction_error() => {
            eprintln!("error: {}: cannot analyze loop: {}", cli.file.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("error: {}: {}", cli.file.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "parloop_analysis=debug",
        _ => "parloop_analysis=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging unavailable: {}", e);
    }
}

/// Preset, then `PARLOOP_*` environment, then flags
fn build_config(cli: &Cli) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let preset = Preset::from_str(&cli.preset)?;
    let mut config = AnalysisConfig::from_preset(preset).with_env_overrides()?;

    if let Some(solver) = &cli.solver {
        config = config.with_solver(SolverKind::parse(solver)?);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if let Some(max_assignments) = cli.max_assignments {
        config = config.with_max_assignments(max_assignments);
    }
    if let Some(policy) = &cli.alias_policy {
        config = config.with_alias_policy(AliasPolicy::parse(policy)?);
    }
    Ok(config)
}

fn print_text(result: &ConflictResult, explain: bool) {
    for (label, verdict) in [
        ("write-write", &result.write_write),
        ("read-write", &result.read_write),
    ] {
        let answer = match verdict {
            ConflictVerdict::NoConflict => "no".to_string(),
            ConflictVerdict::Conflict(_) => "yes".to_string(),
            ConflictVerdict::Indeterminate(reason) => format!("indeterminate ({})", reason),
        };
        println!("{} conflict: {}", label, answer);
    }

    if explain {
        for (label, verdict) in [
            ("write-write", &result.write_write),
            ("read-write", &result.read_write),
        ] {
            if let Some(witness) = verdict.witness() {
                println!("  {}: {}", label, witness);
            }
        }
    }
}

fn print_json(cli: &Cli, result: &ConflictResult) {
    let report = serde_json::json!({
        "file": cli.file.display().to_string(),
        "write_write": result.write_write,
        "read_write": result.read_write,
        "parallelizable": result.is_parallelizable().ok(),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("error: cannot render JSON: {}", e),
    }
}
