//! Market-data provider seam
//!
//! The orchestrator only needs two things from a data source: a daily close
//! series for a symbol and whatever descriptive fields the source has for
//! it. Every profile field is optional and missing fields are not errors.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::config::LookbackPeriod;
use crate::error::{Result, StockError};
use crate::model::PriceSeries;

static SYMBOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9^][A-Z0-9.\-=^]{0,14}$").expect("symbol pattern is valid")
});

/// Upper-case and validate a ticker symbol
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    if SYMBOL_PATTERN.is_match(&symbol) {
        Ok(symbol)
    } else {
        Err(StockError::InvalidSymbol(raw.to_string()))
    }
}

/// Descriptive and fundamental fields for one symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub eps: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub roe: Option<f64>,
}

impl CompanyProfile {
    /// A profile with every field missing
    pub fn unavailable(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }
}

/// Source of price history and company profiles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily closes for `symbol` over `period`, oldest first
    async fn price_history(&self, symbol: &str, period: LookbackPeriod) -> Result<PriceSeries>;

    /// Descriptive fields for `symbol`; absent fields are `None`
    async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("brk.b").unwrap(), "BRK.B");
        assert_eq!(normalize_symbol("^GSPC").unwrap(), "^GSPC");
        assert_eq!(normalize_symbol("EURUSD=X").unwrap(), "EURUSD=X");
    }

    #[test]
    fn test_reject_invalid_symbols() {
        for bad in ["", "   ", "AA PL", "'AAPL'", "AAPL;DROP", "ABCDEFGHIJKLMNOPQ"] {
            assert!(
                matches!(normalize_symbol(bad), Err(StockError::InvalidSymbol(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unavailable_profile() {
        let profile = CompanyProfile::unavailable("XYZ");
        assert_eq!(profile.symbol, "XYZ");
        assert!(profile.sector.is_none());
        assert!(profile.pe_ratio.is_none());
    }
}
