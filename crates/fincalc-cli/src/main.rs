mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::catalog::{ListArgs, RunArgs};
use commands::currency::ConvertArgs;
use commands::investment::{CompoundArgs, SimpleInterestArgs, SipArgs};
use commands::loan::{AffordabilityArgs, EmiArgs, ScheduleArgs};
use commands::tax::TaxArgs;

/// Loan, tax, investment and currency calculators
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Loan, tax, investment and currency calculators",
    long_about = "A CLI for everyday financial calculators with decimal precision. \
                  Supports EMI and amortization schedules, progressive income tax, \
                  compound interest, SIP projections and currency conversion."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Settings file (JSON or YAML)
    #[arg(long, env = "FINCALC_SETTINGS", global = true)]
    settings: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the equated monthly installment for a loan
    Emi(EmiArgs),
    /// Build a month-by-month amortization schedule
    Amortization(ScheduleArgs),
    /// Largest loan a monthly budget can service
    Affordability(AffordabilityArgs),
    /// Progressive income tax after deductions
    Tax(TaxArgs),
    /// Compound interest with a chosen compounding frequency
    CompoundInterest(CompoundArgs),
    /// Simple interest over a period in years
    SimpleInterest(SimpleInterestArgs),
    /// Future value of a systematic monthly investment
    Sip(SipArgs),
    /// Convert an amount between currencies
    Convert(ConvertArgs),
    /// List the calculators in the catalog
    List(ListArgs),
    /// Run any catalog calculator by slug on JSON input
    Run(RunArgs),
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
    logging::init(cli.verbose);

    let settings = match config::load_settings(cli.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loan::run_emi(args, &settings),
        Commands::Amortization(args) => commands::loan::run_schedule(args, &settings),
        Commands::Affordability(args) => commands::loan::run_affordability(args),
        Commands::Tax(args) => commands::tax::run_tax(args, &settings),
        Commands::CompoundInterest(args) => commands::investment::run_compound(args),
        Commands::SimpleInterest(args) => commands::investment::run_simple_interest(args),
        Commands::Sip(args) => commands::investment::run_sip(args),
        Commands::Convert(args) => commands::currency::run_convert(args),
        Commands::List(args) => commands::catalog::run_list(args),
        Commands::Run(args) => commands::catalog::run_calculator(args, &settings),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, &settings);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
