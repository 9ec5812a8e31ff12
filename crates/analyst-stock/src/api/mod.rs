//! API clients for market-data sources

pub mod alpha_vantage;
pub mod yahoo;

pub use alpha_vantage::{AlphaVantageClient, CompanyOverview};
pub use yahoo::{KeyStatistics, YahooFinanceClient};
