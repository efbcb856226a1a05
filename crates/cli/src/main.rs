//! Command Line Interface for Uniswap V3 position reporting.
mod config;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{ReportConfig, parse_price_override};
use dotenv::dotenv;
use lp_report_data::providers::{SnapshotChainReader, StaticPriceOracle, WithOverrides};
use lp_report_data::reporter::PositionReport;
use lp_report_data::{ChainReader, PositionReporter};
use lp_report_domain::entities::TokenId;
use lp_report_domain::enums::RangeStatus;
use lp_report_domain::math::price_tick::{tick_to_adjusted_price, tick_to_price};
use lp_report_domain::math::{amounts_for_liquidity, sqrt_ratio_at_tick};
use lp_report_domain::metrics::{PortfolioSummary, PriceBook, in_range_only};
use lp_report_domain::value_objects::Amount;
use lp_report_domain::valuation::ValuationOutcome;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "lp-report")]
#[command(about = "Uniswap V3 position valuation and reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value positions from a chain snapshot
    Value {
        /// Snapshot JSON file (positions, pools, tokens, owners)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Position NFT id to value (repeatable); defaults to every position
        #[arg(long = "token-id")]
        token_ids: Vec<TokenId>,

        /// Value the positions held by this owner address
        #[arg(long, conflicts_with = "token_ids")]
        owner: Option<String>,

        /// USD price override, e.g. ETH=2000 (repeatable)
        #[arg(long = "price", value_parser = parse_price_override)]
        prices: Vec<(String, Decimal)>,

        /// Fetch USD reference rates from CoinMetrics
        #[arg(long, default_value_t = false)]
        coinmetrics: bool,

        /// Comma-separated symbols quoted in the other token (e.g. WETH,WBTC)
        #[arg(long)]
        base_symbols: Option<String>,

        /// Only list positions whose price is in range
        #[arg(long, default_value_t = false)]
        in_range_only: bool,

        /// Write all outcomes and the summary as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Show sqrtPriceX96 and price at a tick
    Tick {
        /// Tick index
        #[arg(short, long, allow_hyphen_values = true)]
        tick: i32,

        /// Token0 decimals
        #[arg(long, default_value_t = 18)]
        decimals0: u8,

        /// Token1 decimals
        #[arg(long, default_value_t = 18)]
        decimals1: u8,
    },
    /// Token amounts for a hypothetical position
    Amounts {
        /// Position liquidity
        #[arg(short, long)]
        liquidity: u128,

        /// Lower tick
        #[arg(long, allow_hyphen_values = true)]
        tick_lower: i32,

        /// Upper tick
        #[arg(long, allow_hyphen_values = true)]
        tick_upper: i32,

        /// Current pool tick
        #[arg(long, allow_hyphen_values = true)]
        current_tick: i32,

        /// Token0 decimals
        #[arg(long, default_value_t = 18)]
        decimals0: u8,

        /// Token1 decimals
        #[arg(long, default_value_t = 18)]
        decimals1: u8,
    },
}

#[derive(Serialize)]
struct JsonReport<'a> {
    positions: &'a [ValuationOutcome],
    summary: &'a PortfolioSummary,
    prices: &'a PriceBook,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Value {
            snapshot,
            token_ids,
            owner,
            prices,
            coinmetrics,
            base_symbols,
            in_range_only: only_in_range,
            json,
        } => {
            let config = ReportConfig::from_env().with_base_symbols(base_symbols.as_deref());

            println!("📂 Loading snapshot {}...", snapshot.display());
            let reader = SnapshotChainReader::from_path(&snapshot).await?;

            let ids = match &owner {
                Some(owner) => reader.token_ids_of(owner).await?,
                None if token_ids.is_empty() => reader.token_ids(),
                None => token_ids,
            };
            if ids.is_empty() {
                println!("❌ No positions to value.");
                return Ok(());
            }

            let reporter = PositionReporter::with_valuator(reader.clone(), reader, config.valuator());
            let overrides: PriceBook = prices.into_iter().collect();

            println!("🔍 Valuing {} position(s)...", ids.len());
            let report = if coinmetrics {
                if config.coinmetrics_api_key.is_none() {
                    println!("⚠️  {} is not set, requesting without an API key.", config::COINMETRICS_API_KEY);
                }
                let oracle = WithOverrides::new(config.coinmetrics(), overrides);
                reporter.report(&ids, &oracle).await?
            } else {
                reporter.report(&ids, &StaticPriceOracle::new(overrides)).await?
            };

            print_report(&report, only_in_range);

            if let Some(path) = json {
                let body = serde_json::to_string_pretty(&JsonReport {
                    positions: &report.outcomes,
                    summary: &report.summary,
                    prices: &report.prices,
                })?;
                tokio::fs::write(&path, body)
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "report written");
                println!("💾 Saved JSON report to {}", path.display());
            }
        }
        Commands::Tick {
            tick,
            decimals0,
            decimals1,
        } => {
            let sqrt_price = sqrt_ratio_at_tick(tick)?;
            println!("Tick:          {tick}");
            println!("sqrtPriceX96:  {sqrt_price}");
            println!("Raw price:     {}", tick_to_price(tick)?);
            println!(
                "Price:         {} (token1 per token0, decimals {decimals0}/{decimals1})",
                tick_to_adjusted_price(tick, decimals0, decimals1)?
            );
        }
        Commands::Amounts {
            liquidity,
            tick_lower,
            tick_upper,
            current_tick,
            decimals0,
            decimals1,
        } => {
            let sqrt_price = sqrt_ratio_at_tick(current_tick)?;
            let (amount0, amount1) = amounts_for_liquidity(liquidity, tick_lower, tick_upper, sqrt_price)?;
            let status = RangeStatus::classify(tick_lower, tick_upper, current_tick, liquidity);

            println!("Range status:  {status}");
            println!("sqrtPriceX96:  {sqrt_price}");
            println!(
                "Amount0:       {amount0} raw ({})",
                Amount::new(amount0, decimals0).to_big_decimal()
            );
            println!(
                "Amount1:       {amount1} raw ({})",
                Amount::new(amount1, decimals1).to_big_decimal()
            );
        }
    }

    Ok(())
}

fn print_report(report: &PositionReport, only_in_range: bool) {
    let table = if only_in_range {
        render::positions_table(in_range_only(&report.outcomes), &report.prices)
    } else {
        render::positions_table(
            report.outcomes.iter().filter_map(ValuationOutcome::valuation),
            &report.prices,
        )
    };

    println!("\n📊 Positions");
    table.printstd();

    if let Some(errors) = render::errors_table(&report.outcomes) {
        println!("\n❌ Failed positions");
        errors.printstd();
    }

    println!("\n════════════════════════════════════");
    println!("{}", render::summary_text(&report.summary));
    println!("════════════════════════════════════");
}
