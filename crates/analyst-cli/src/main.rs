//! Command-line interface for stock-analyst
//!
//! # Usage
//!
//! ```bash
//! # Optional: company fundamentals and commentary
//! export ALPHA_VANTAGE_API_KEY="your-key"
//! export NARRATIVE_API_BASE="https://api.example.com/analyze"
//!
//! stock-analyst AAPL MSFT --list watchlist.txt --format table
//! ```

use analyst_llm::{NarrativeConfig, build_provider};
use analyst_stock::{AnalystConfig, FinancialAnalyst, LiveMarketData, OutputFormat, load_watchlists};
use analyst_utils::{LogFormat, init_tracing};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "stock-analyst", version)]
#[command(about = "Buy/Hold/Sell recommendations for a list of tickers", long_about = None)]
struct Args {
    /// Ticker symbols to analyze
    tickers: Vec<String>,

    /// Watch-list file to read tickers from; may be repeated
    #[arg(short, long = "list", value_name = "FILE")]
    lists: Vec<PathBuf>,

    /// Recommendation horizon in months
    #[arg(long, default_value_t = 3)]
    horizon: u32,

    /// Output format: text, table or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Tickers analyzed at once
    #[arg(short, long, default_value_t = 1)]
    concurrency: usize,

    /// Market benchmark symbol
    #[arg(long)]
    benchmark: Option<String>,

    /// Include every analysis section in text output
    #[arg(short, long)]
    detailed: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Positional tickers first, then each list in order
    fn collect_tickers(&self) -> anyhow::Result<Vec<String>> {
        let mut tickers = self.tickers.clone();
        tickers.extend(load_watchlists(&self.lists)?);
        if tickers.is_empty() {
            anyhow::bail!("no tickers given, pass symbols or --list <FILE>");
        }
        Ok(tickers)
    }

    fn analyst_config(&self) -> anyhow::Result<AnalystConfig> {
        let mut builder = AnalystConfig::builder()
            .horizon_months(self.horizon)
            .max_concurrency(self.concurrency);
        if let Some(benchmark) = &self.benchmark {
            builder = builder.market_benchmark(benchmark.clone());
        }
        Ok(builder.with_env().build()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize tracing
    init_tracing(if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    let tickers = args.collect_tickers()?;
    let config = args.analyst_config()?;

    let market_data = Arc::new(LiveMarketData::from_config(&config)?);
    let narrator = build_provider(&NarrativeConfig::from_env()?)?;
    info!(
        narrator = narrator.name(),
        tickers = tickers.len(),
        "Starting stock-analyst"
    );

    let analyst = FinancialAnalyst::new(market_data, narrator, config)?;
    let outcomes = analyst.analyze_batch(&tickers).await;

    let formatter = args.format.formatter(args.detailed);
    println!("{}", formatter.format_batch(&outcomes));

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        warn!(failed, total = outcomes.len(), "Some tickers could not be analyzed");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
