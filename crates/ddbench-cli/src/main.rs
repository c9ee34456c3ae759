//! ddbench Command-Line Interface
//!
//! Error bounds for approximate decision-diagram simulation, and loading of
//! the benchmark runs that measure them.
//!
//! ```text
//! ddbench bound --n 20 --epsilon 1e-15 --delta 1e-10
//! ddbench sweep --n-min 10 --n-max 60 --delta 1e-10 --delta 1e-15
//! ddbench load results/exp1 --categories categories.json --errors results/exp1/errors
//! ddbench errors compute results/exp1 results/exp1/errors
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{bound, errors, load, suggest_delta, sweep, version};

/// ddbench - error bounds and benchmark results for decision-diagram simulators
#[derive(Parser)]
#[command(name = "ddbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the error bound for one parameter set
    Bound {
        /// Circuit depth
        #[arg(short, long)]
        n: u32,

        /// Per-operation relative floating-point error
        #[arg(short, long, default_value = "1e-16")]
        epsilon: f64,

        /// Truncation threshold
        #[arg(short, long)]
        delta: f64,

        /// Use the first-order approximations
        #[arg(long)]
        approx: bool,

        /// Significant decimal digits
        #[arg(long, default_value = "128")]
        precision: u64,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Suggest a truncation threshold for a target error
    SuggestDelta {
        /// Circuit depth
        #[arg(short, long)]
        n: u32,

        /// Per-operation relative floating-point error
        #[arg(short, long, default_value = "1e-16")]
        epsilon: f64,

        /// Target total error
        #[arg(short, long)]
        target: f64,
    },

    /// Tabulate the truncation error over a range of depths
    Sweep {
        /// Smallest depth
        #[arg(long, default_value = "1")]
        n_min: u32,

        /// Largest depth (inclusive)
        #[arg(long, default_value = "100")]
        n_max: u32,

        /// Truncation thresholds, one series each
        #[arg(short, long = "delta", required = true)]
        deltas: Vec<f64>,

        /// Per-operation relative floating-point error
        #[arg(short, long, default_value = "1e-16")]
        epsilon: f64,

        /// Use the first-order approximation
        #[arg(long)]
        approx: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Load and reconcile the runs of an experiment directory
    Load {
        /// Experiment directory with json/, logs/ and meta/
        exp_dir: PathBuf,

        /// Fill fields missing from older result formats
        #[arg(long)]
        add_missing: bool,

        /// Category configuration file
        #[arg(short, long)]
        categories: Option<PathBuf>,

        /// Directory of error reports to merge
        #[arg(long)]
        errors: Option<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Compute or show state-vector errors against ground-truth runs
    Errors {
        #[command(subcommand)]
        action: ErrorsAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum ErrorsAction {
    /// Compare every run with its circuit's ground truth and write reports
    Compute {
        /// Experiment directory with json/
        exp_dir: PathBuf,

        /// Output directory for reports (must not exist)
        errors_dir: PathBuf,
    },

    /// Print previously computed reports
    Show {
        /// Directory of error reports
        errors_dir: PathBuf,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Bound {
            n,
            epsilon,
            delta,
            approx,
            precision,
            format,
        } => bound::execute(n, epsilon, delta, approx, precision, &format),

        Commands::SuggestDelta { n, epsilon, target } => {
            suggest_delta::execute(n, epsilon, target)
        }

        Commands::Sweep {
            n_min,
            n_max,
            deltas,
            epsilon,
            approx,
            format,
        } => sweep::execute(n_min, n_max, &deltas, epsilon, approx, &format),

        Commands::Load {
            exp_dir,
            add_missing,
            categories,
            errors: errors_dir,
            format,
        } => load::execute(
            &exp_dir,
            add_missing,
            categories.as_deref(),
            errors_dir.as_deref(),
            &format,
        ),

        Commands::Errors { action } => match action {
            ErrorsAction::Compute {
                exp_dir,
                errors_dir,
            } => errors::execute_compute(&exp_dir, &errors_dir),
            ErrorsAction::Show { errors_dir, format } => errors::execute_show(&errors_dir, &format),
        },

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
