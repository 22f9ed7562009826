#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "conncomp: split an edge list into connected components and prune redundant edges",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Split an edge list and prune each component",
        long_about = "Split an edge list into connected components, remove up to N random \
                      edges from each without disconnecting it, and write one edge list per \
                      component to <BASE>_<index>.csv.",
        after_help = "EXAMPLES:\n    # Split edges.csv into processed_0.csv, processed_1.csv, ...\n    conncomp split --graph edges.csv\n\n    # Remove up to 5 edges per component, reproducibly\n    conncomp split --graph edges.csv --remove 5 --seed 42 -o run/pruned\n\n    # Read stdin and print a machine-readable summary\n    cat edges.csv | conncomp split --remove 2 --json"
    )]
    Split(cmd::split::SplitArgs),

    #[command(
        about = "Show statistics for an edge list",
        long_about = "Report node, edge and component counts for an edge list without writing artifacts.",
        after_help = "EXAMPLES:\n    # Summarize a file\n    conncomp stats --graph edges.csv\n\n    # Emit machine-readable output\n    conncomp stats --graph edges.csv --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "Concatenate the leading data lines of several files",
        long_about = "Copy each input's lines up to its first blank or `#` line into the last \
                      path given. Unreadable inputs are skipped and make the command fail.",
        after_help = "EXAMPLES:\n    # Merge two edge lists into one\n    conncomp gather a.csv b.csv all.csv"
    )]
    Gather(cmd::gather::GatherArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CONNCOMP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "conncomp=debug,warn"
        } else {
            "warn"
        })
    });

    let format = env::var("CONNCOMP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    match &cli.command {
        Commands::Split(args) => cmd::split::run_split(args, output, &project_root),
        Commands::Stats(args) => cmd::stats::run_stats(args, output),
        Commands::Gather(args) => cmd::gather::run_gather(args, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            let error = CliError::from(&err);
            if render_error(cli.output_mode(), &error).is_err() {
                eprintln!("error[{}]: {}", error.error_code, error.message);
            }
            ExitCode::FAILURE
        }
    }
}
