mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::AffordabilityArgs;
use commands::amortization::AmortizeArgs;

/// Mortgage amortization and affordability calculations
#[derive(Parser)]
#[command(
    name = "hfa",
    version,
    about = "Mortgage amortization and affordability calculations",
    long_about = "A CLI for mortgage payment and pre-qualification math with \
                  decimal precision. Computes level-payment amortization \
                  schedules with escrow add-ons, and maximum qualifying \
                  purchase prices from income, debt, credit and cash."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a payment breakdown and amortization schedule
    Amortize(AmortizeArgs),
    /// Estimate the maximum qualifying purchase price
    Affordability(AffordabilityArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Version => {
            println!("hfa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
