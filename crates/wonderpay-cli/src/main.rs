mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::capital::CapitalArgs;

/// WonderPay capital loan calculations
#[derive(Parser)]
#[command(
    name = "wonderpay",
    version,
    about = "WonderPay capital loan calculations",
    long_about = "A CLI for WonderPay Capital loan offers. Computes the level monthly \
                  payment, total interest and full amortization schedule with decimal \
                  precision, from flags, a JSON file or piped JSON."
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
    /// Calculate monthly payment, totals and amortization schedule for a loan
    CapitalCalculate(CapitalArgs),
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
        Commands::CapitalCalculate(args) => commands::capital::run_capital_calculate(args),
        Commands::Version => {
            println!("wonderpay {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    let printed = result
        .and_then(|value| output::format_output(&cli.output, &value).map_err(Into::into));
    if let Err(e) = printed {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }
}
