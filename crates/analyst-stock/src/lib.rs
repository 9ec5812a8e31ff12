//! Single-stock recommendation pipeline
//!
//! This crate turns price history, company ratios and short narrative
//! commentary into a scored Buy/Hold/Sell recommendation with a target price.
//! It includes:
//!
//! - An indicator engine (SMA50/SMA200, 14-day RSI, trend classification)
//! - A valuation model (forward EPS times PE, discounted, trend adjusted)
//! - A three-signal scoring rule
//! - The `FinancialAnalyst` orchestrator and its batch entry point
//! - Live market data from Yahoo Finance and Alpha Vantage, with a TTL cache
//! - Plain text, table and JSON report formatters
//! - Watch-list loading
//!
//! # Architecture
//!
//! `FinancialAnalyst` owns two collaborators behind traits:
//! - [`MarketDataProvider`]: price series and company profiles
//! - [`analyst_llm::NarrativeProvider`]: commentary text
//!
//! Collaborator failures degrade individual fields (absent metrics, fallback
//! commentary). Only a missing price series for the ticker itself fails that
//! ticker, and a batch always runs to the end.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_stock::{AnalystConfig, FinancialAnalyst, LiveMarketData};
//! use analyst_llm::{NarrativeConfig, build_provider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalystConfig::builder().with_env().horizon_months(3).build()?;
//!     let market_data = Arc::new(LiveMarketData::from_config(&config)?);
//!     let narrator = build_provider(&NarrativeConfig::from_env()?)?;
//!
//!     let analyst = FinancialAnalyst::new(market_data, narrator, config)?;
//!     let report = analyst.analyze("AAPL").await?;
//!     println!("{}", report.recommendation.verdict());
//!
//!     Ok(())
//! }
//! ```

pub mod analyst;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod formatter;
pub mod indicators;
pub mod live;
pub mod model;
pub mod narrative;
pub mod prompts;
pub mod provider;
pub mod report;
pub mod scoring;
pub mod sector;
pub mod valuation;
pub mod watchlist;

// Re-export main types for convenience
pub use analyst::FinancialAnalyst;
pub use config::{AnalystConfig, AnalystConfigBuilder, LookbackPeriod};
pub use error::{Result, StockError};
pub use formatter::{
    JsonFormatter, OutputFormat, PlainTextFormatter, ReportFormatter, TableFormatter,
};
pub use live::LiveMarketData;
pub use model::{
    FundamentalMetrics, MarketInsights, Metric, PricePoint, PriceSeries, Recommendation,
    SectorInsights, TechnicalIndicators, Trend, Verdict,
};
pub use narrative::NarrativeOutcome;
pub use provider::{CompanyProfile, MarketDataProvider};
pub use report::{AnalysisReport, TickerOutcome};
pub use scoring::ScoreCard;
pub use valuation::ValuationModel;
pub use watchlist::{load_watchlist, load_watchlists, parse_watchlist};
