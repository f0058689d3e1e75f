//! mnav - compute mNAV and fair-value metrics for Bitcoin treasury companies.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use mnav_common::prelude::{init_logging, Config};
use mnav_core::input::{format_btc, format_ratio, format_shares_outstanding, format_usd, format_usd_price};
use mnav_core::snapshot::{export_legacy, ExportEnvelope};
use mnav_core::{
    initial_companies, read_snapshot_file, write_snapshot_file, CompanyWithCalculations,
    Dashboard, FeedEvent, SortConfig, SortDirection, SortKey,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mnav")]
#[command(version)]
#[command(about = "mNAV dashboard for Digital Asset Treasury companies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute metrics for every company in a snapshot
    Calc {
        /// Snapshot file (default: the configured state file, else the built-in list)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Bitcoin price in USD
        #[arg(long)]
        btc_price: Option<f64>,

        /// Stock price as TICKER=VALUE (repeatable)
        #[arg(long = "price", value_parser = parse_ticker_value)]
        prices: Vec<(String, f64)>,

        /// Shares outstanding as TICKER=VALUE, K/M/B suffixes allowed (repeatable)
        #[arg(long = "shares", value_parser = parse_ticker_value)]
        shares: Vec<(String, f64)>,

        /// Column to sort by (e.g. mnav, ticker, market-cap)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check whether a snapshot file can be imported
    Validate {
        /// Snapshot file
        path: PathBuf,
    },

    /// Print the built-in company list as a snapshot
    Seed {
        /// Bare array instead of the versioned envelope
        #[arg(long)]
        legacy: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// `TICKER=VALUE`, where VALUE accepts commas, `$` and K/M/B suffixes.
fn parse_ticker_value(s: &str) -> std::result::Result<(String, f64), String> {
    let (ticker, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TICKER=VALUE, got `{s}`"))?;
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(format!("missing ticker in `{s}`"));
    }
    let value = mnav_core::input::parse_shares_input(&value.replace('$', ""))
        .filter(|v| *v > 0.0)
        .ok_or_else(|| format!("`{value}` is not a positive number"))?;
    Ok((ticker.to_string(), value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_and_validate()?;
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    tracing::debug!("mnav v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Calc {
            snapshot,
            btc_price,
            prices,
            shares,
            sort,
            desc,
            json,
        } => {
            let mut dashboard = Dashboard::with_seed(config.dashboard.mnav_bands);
            let snapshot = snapshot.or_else(|| {
                let path = config.dashboard.state_file_or_default();
                path.exists().then_some(path)
            });
            if let Some(path) = snapshot {
                dashboard.import(read_snapshot_file(&path)?)?;
            }

            let now = Utc::now();
            let events = btc_price
                .map(|price| FeedEvent::BitcoinPrice { price })
                .into_iter()
                .chain(
                    prices
                        .into_iter()
                        .map(|(ticker, price)| FeedEvent::StockPrice { ticker, price }),
                )
                .chain(
                    shares
                        .into_iter()
                        .map(|(ticker, shares)| FeedEvent::SharesOutstanding { ticker, shares }),
                );
            for event in events {
                let described = format!("{event:?}");
                if !dashboard.apply(event, now) {
                    bail!("Rejected input: {described}");
                }
            }

            if let Some(key) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                dashboard.set_sort_config(SortConfig::new(key, direction));
            }

            let rows = dashboard.companies_with_calculations();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_table(dashboard.bitcoin_price(), &rows);
            }
        }

        Commands::Validate { path } => match read_snapshot_file(&path) {
            Ok(data) => println!(
                "{}: OK ({} companies, {:?} format)",
                path.display(),
                data.companies.len(),
                data.format
            ),
            Err(e) => bail!("{}: {e}", path.display()),
        },

        Commands::Seed { legacy, output } => {
            let companies = initial_companies();
            match (legacy, output) {
                (false, Some(path)) => {
                    let envelope = ExportEnvelope::new(companies, None, None, Utc::now());
                    write_snapshot_file(&path, &envelope)?;
                }
                (false, None) => println!(
                    "{}",
                    ExportEnvelope::new(companies, None, None, Utc::now()).to_json_pretty()?
                ),
                (true, Some(path)) => write_output(&path, &export_legacy(&companies)?)?,
                (true, None) => println!("{}", export_legacy(&companies)?),
            }
        }
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_table(bitcoin_price: Option<f64>, rows: &[CompanyWithCalculations]) {
    println!("BTC price: {}", format_usd_price(bitcoin_price));
    println!();
    println!(
        "{:<7} {:<28} {:>12} {:>10} {:>12} {:>18} {:>8} {:>9} {:>12} {:>14}",
        "Ticker", "Name", "Price", "Shares", "BTC", "Market cap", "mNAV", "Band", "Fair price",
        "Equil. BTC"
    );
    for row in rows {
        let m = &row.metrics;
        println!(
            "{:<7} {:<28} {:>12} {:>10} {:>12} {:>18} {:>8} {:>9} {:>12} {:>14}",
            row.company.ticker,
            truncate(&row.company.name, 28),
            format_usd_price(row.stock_price),
            format_shares_outstanding(row.shares_outstanding),
            format_btc(row.company.bitcoin),
            format_usd(m.market_cap),
            format_ratio(m.mnav),
            row.mnav_band.map_or_else(String::new, |b| b.to_string()),
            format_usd_price(m.fair_stock_price),
            format_usd(m.equilibrium_btc_price),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}
