//! vest-valuator CLI - yen valuation of vested stock lots
//!
//! ## Example Usage
//!
//! ```bash
//! # Value a broker export with the default 2024 rate table
//! vest-valuator < vests.csv
//!
//! # Use another year's table
//! EXCHANGE_RATE_URL=https://www.77bank.co.jp/kawase/usd2023.html vest-valuator < vests.csv
//!
//! # Dump the loaded rates and look one up
//! vest-valuator rates 20240116
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use vest_valuator::config::Config;
use vest_valuator::error::Result;
use vest_valuator::fx::{RateCache, RateLookup};
use vest_valuator::report;
use vest_valuator::valuation::LotValuator;

/// vest-valuator: Japanese-yen value of vested stock lots
#[derive(Parser)]
#[command(name = "vest-valuator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Values vested stock lots in JPY using published USD/JPY rates", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Rate table URL (overrides EXCHANGE_RATE_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Read the rate table from a saved HTML file instead of fetching it
    #[arg(long, global = true)]
    rates_file: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read CSV from stdin and print the yen report (default)
    Report,

    /// Print the loaded rate table
    Rates {
        /// Rate key to look up (YYYYMMDD)
        #[arg(value_name = "DATE_KEY")]
        date: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).with_env();
    if let Some(url) = cli.url {
        config.rate_url = url;
    }
    if let Some(path) = cli.rates_file {
        config.rate_file = Some(path);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    if cli.verbose {
        eprintln!(
            "{} v{}",
            "vest-valuator".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        let source = match &config.rate_file {
            Some(path) => path.display().to_string(),
            None => config.rate_url.clone(),
        };
        eprintln!("Rate source: {}", source.dimmed());
    }

    let result = match cli.command.unwrap_or(Commands::Report) {
        Commands::Report => run_report(&config),
        Commands::Rates { date } => show_rates(&config, date.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run_report(config: &Config) -> Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let cache = RateCache::from_boxed(config.rate_source()?);
    let valuation = LotValuator::new(&cache).value_all(&input)?;

    if !valuation.skipped.is_empty() {
        log::info!("{} record(s) left out of the report", valuation.skipped.len());
    }

    report::print(&valuation)?;
    Ok(())
}

fn show_rates(config: &Config, date: Option<&str>) -> Result<()> {
    let cache = RateCache::from_boxed(config.rate_source()?);
    let rates = cache.rates()?;

    println!("取得した為替レートデータ:");
    for (key, rate) in rates.iter() {
        println!("{}: {}", key, report::natural(rate));
    }

    if let Some(date) = date {
        match cache.get_rate(date)? {
            Some(rate) => println!("\n{}の為替レート: {}", date, report::natural(rate)),
            None => println!("\n{}の為替レートは見つかりませんでした", date),
        }
    }

    Ok(())
}
