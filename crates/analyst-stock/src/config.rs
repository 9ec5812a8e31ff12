//! Configuration for the analysis pipeline

use crate::error::{Result, StockError};
use analyst_utils::{env_parse, env_var};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default forward EPS growth used by the valuation model
pub const DEFAULT_GROWTH_RATE: f64 = 0.05;
/// Default discount applied to the forward valuation
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.10;

/// History window requested from the market-data provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackPeriod {
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
}

impl LookbackPeriod {
    /// Range string understood by Yahoo Finance
    pub fn as_range(&self) -> &'static str {
        match self {
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }
}

/// Configuration for stock analysis operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Forward EPS growth rate for the valuation model
    pub growth_rate: f64,

    /// Discount rate for the valuation model
    pub discount_rate: f64,

    /// Horizon the recommendation is framed over, in months
    pub horizon_months: u32,

    /// Price history requested for every series
    pub lookback: LookbackPeriod,

    /// Market benchmark symbol
    pub market_benchmark: String,

    /// Sector proxy used when a company's sector is unknown
    pub fallback_sector_etf: String,

    /// Request timeout for market-data calls
    pub request_timeout: Duration,

    /// Cache TTL for price series and company profiles
    pub cache_ttl: Duration,

    /// Number of tickers analysed at once (1 = strictly sequential)
    pub max_concurrency: usize,

    /// Alpha Vantage API key (optional)
    pub alpha_vantage_api_key: Option<String>,

    /// Alpha Vantage requests per minute
    pub alpha_vantage_rate_limit: u32,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            growth_rate: DEFAULT_GROWTH_RATE,
            discount_rate: DEFAULT_DISCOUNT_RATE,
            horizon_months: 12,
            lookback: LookbackPeriod::OneYear,
            market_benchmark: "^GSPC".to_string(),
            fallback_sector_etf: "SPY".to_string(),
            request_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300),
            max_concurrency: 1,
            alpha_vantage_api_key: None,
            alpha_vantage_rate_limit: 5, // free tier
        }
    }
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.growth_rate.is_finite() || self.growth_rate <= -1.0 {
            return Err(StockError::ConfigError(
                "growth_rate must be finite and greater than -1".to_string(),
            ));
        }

        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(StockError::ConfigError(
                "discount_rate must be finite and greater than -1".to_string(),
            ));
        }

        if self.horizon_months == 0 {
            return Err(StockError::ConfigError(
                "horizon_months must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrency == 0 {
            return Err(StockError::ConfigError(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.market_benchmark.trim().is_empty() || self.fallback_sector_etf.trim().is_empty() {
            return Err(StockError::ConfigError(
                "benchmark and fallback sector symbols must not be empty".to_string(),
            ));
        }

        if self.alpha_vantage_rate_limit == 0 {
            return Err(StockError::ConfigError(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    growth_rate: Option<f64>,
    discount_rate: Option<f64>,
    horizon_months: Option<u32>,
    lookback: Option<LookbackPeriod>,
    market_benchmark: Option<String>,
    fallback_sector_etf: Option<String>,
    request_timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
    max_concurrency: Option<usize>,
    alpha_vantage_api_key: Option<String>,
    alpha_vantage_rate_limit: Option<u32>,
}

impl AnalystConfigBuilder {
    /// Set the valuation growth rate
    pub fn growth_rate(mut self, rate: f64) -> Self {
        self.growth_rate = Some(rate);
        self
    }

    /// Set the valuation discount rate
    pub fn discount_rate(mut self, rate: f64) -> Self {
        self.discount_rate = Some(rate);
        self
    }

    /// Set the recommendation horizon
    pub fn horizon_months(mut self, months: u32) -> Self {
        self.horizon_months = Some(months);
        self
    }

    /// Set the history window
    pub fn lookback(mut self, lookback: LookbackPeriod) -> Self {
        self.lookback = Some(lookback);
        self
    }

    /// Set the market benchmark symbol
    pub fn market_benchmark(mut self, symbol: impl Into<String>) -> Self {
        self.market_benchmark = Some(symbol.into());
        self
    }

    /// Set the sector proxy for unknown sectors
    pub fn fallback_sector_etf(mut self, symbol: impl Into<String>) -> Self {
        self.fallback_sector_etf = Some(symbol.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set cache TTL
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set how many tickers may be analysed at once
    pub fn max_concurrency(mut self, workers: usize) -> Self {
        self.max_concurrency = Some(workers);
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set Alpha Vantage requests per minute
    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Load settings from the environment
    ///
    /// Reads `ALPHA_VANTAGE_API_KEY`, `ALPHA_VANTAGE_RATE_LIMIT`,
    /// `ANALYST_GROWTH_RATE`, `ANALYST_DISCOUNT_RATE` and `ANALYST_BENCHMARK`.
    /// Values already set on the builder win.
    pub fn with_env(mut self) -> Self {
        if self.alpha_vantage_api_key.is_none() {
            self.alpha_vantage_api_key = env_var("ALPHA_VANTAGE_API_KEY");
        }
        if self.alpha_vantage_rate_limit.is_none() {
            self.alpha_vantage_rate_limit = env_parse("ALPHA_VANTAGE_RATE_LIMIT");
        }
        if self.growth_rate.is_none() {
            self.growth_rate = env_parse("ANALYST_GROWTH_RATE");
        }
        if self.discount_rate.is_none() {
            self.discount_rate = env_parse("ANALYST_DISCOUNT_RATE");
        }
        if self.market_benchmark.is_none() {
            self.market_benchmark = env_var("ANALYST_BENCHMARK");
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let defaults = AnalystConfig::default();

        let config = AnalystConfig {
            growth_rate: self.growth_rate.unwrap_or(defaults.growth_rate),
            discount_rate: self.discount_rate.unwrap_or(defaults.discount_rate),
            horizon_months: self.horizon_months.unwrap_or(defaults.horizon_months),
            lookback: self.lookback.unwrap_or(defaults.lookback),
            market_benchmark: self.market_benchmark.unwrap_or(defaults.market_benchmark),
            fallback_sector_etf: self
                .fallback_sector_etf
                .unwrap_or(defaults.fallback_sector_etf),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            max_concurrency: self.max_concurrency.unwrap_or(defaults.max_concurrency),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}
