mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::warn;

use commands::deal::CommissionArgs;
use commands::property::{AmortizationArgs, AnalyzeArgs, DefaultsArgs};

/// Multifamily property deal analysis
#[derive(Parser)]
#[command(
    name = "dealiq",
    version,
    about = "Multifamily property deal analysis",
    long_about = "Analyse multifamily acquisitions with decimal precision: cap rate, \
                  cash-on-cash, NOI, GRM and DSCR at current and market rents, \
                  upside between the two, and loan amortization schedules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter when RUST_LOG is unset (e.g. "debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a property at current and market rents
    Analyze(AnalyzeArgs),
    /// Build a loan amortization schedule
    Amortization(AmortizationArgs),
    /// Print (and validate) analysis defaults
    Defaults(DefaultsArgs),
    /// Resolve a deal commission from percentage or flat terms
    Commission(CommissionArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(2);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::property::run_analyze(args),
        Commands::Amortization(args) => commands::property::run_amortization(args),
        Commands::Defaults(args) => commands::property::run_defaults(args),
        Commands::Commission(args) => commands::deal::run_commission(args),
        Commands::Version => {
            println!("dealiq {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            if let Some(serde_json::Value::Array(warnings)) = value.get("warnings") {
                for w in warnings.iter().filter_map(|w| w.as_str()) {
                    warn!("{w}");
                }
            }
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
