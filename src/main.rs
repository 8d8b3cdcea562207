//! Calltree Studio CLI
//!
//! Reads a hierarchical call profile and writes one analysis view as JSON.

use anyhow::Result;
use calltree_studio::commands::{
    display_metrics, display_version, execute_analyze, execute_relatives, validate_args,
    validate_profile_file, validate_relatives_args, AnalyzeArgs, RelativesArgs, View,
};
use calltree_studio::utils::config::{DEFAULT_METRIC, DEFAULT_THRESHOLD, DEFAULT_TOP_FUNCTIONS};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// Calltree Studio - call-profile analysis views
#[derive(Parser, Debug)]
#[command(name = "calltree")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a flatten, call-graph or flame-graph view of a profile
    Analyze {
        /// Raw profile JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// View to build
        #[arg(long, value_enum, default_value_t = View::Callgraph)]
        view: View,

        /// Output path for the JSON report (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Metric key (ct, wt, cpu, mu, pmu, ewt, ecpu, emu, epmu)
        #[arg(short, long, env = "CALLTREE_METRIC", default_value = DEFAULT_METRIC)]
        metric: String,

        /// Minimum share of the root total a child must exceed
        #[arg(short, long, env = "CALLTREE_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Attach the flame-graph function ordering to the report
        #[arg(long)]
        with_sort: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of functions in the summary
        #[arg(long, default_value_t = DEFAULT_TOP_FUNCTIONS)]
        top: usize,
    },

    /// Show callers and callees of one function
    Relatives {
        /// Raw profile JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Canonical function name (e.g. "Cache::get")
        #[arg(short, long)]
        function: String,

        /// Metric key used for the callee threshold
        #[arg(short, long, env = "CALLTREE_METRIC", default_value = DEFAULT_METRIC)]
        metric: String,

        /// Minimum share of the function's own metric a callee must exceed
        #[arg(short, long, env = "CALLTREE_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
    },

    /// Validate a profile JSON file
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List recognized metric keys
    Metrics,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            view,
            output,
            metric,
            threshold,
            with_sort,
            summary,
            top,
        } => {
            let args = AnalyzeArgs {
                input,
                output,
                view,
                metric,
                threshold,
                with_sort,
                print_summary: summary,
                top,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Relatives {
            input,
            function,
            metric,
            threshold,
        } => {
            let args = RelativesArgs {
                input,
                function,
                metric,
                threshold,
            };

            validate_relatives_args(&args)?;

            execute_relatives(args)?;
        }

        Commands::Validate { file } => {
            validate_profile_file(file)?;
        }

        Commands::Metrics => {
            display_metrics();
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
