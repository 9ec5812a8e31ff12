//! Typed records produced and consumed by the analysis pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::narrative::NarrativeOutcome;

/// Trading days per year, used to annualise daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One daily close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Chronological daily closes for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, dropping non-finite closes and sorting by date
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Closing prices in chronological order
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Percent change from the first to the last close, rounded to 2 dp
    pub fn period_return_pct(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        let first = self.points.first()?.close;
        let last = self.points.last()?.close;
        if first == 0.0 {
            return None;
        }
        Some(round2((last / first - 1.0) * 100.0))
    }

    /// Annualised volatility of daily percent changes, rounded to 2 dp
    ///
    /// Uses the sample standard deviation; needs at least two daily changes.
    pub fn annualized_volatility_pct(&self) -> Option<f64> {
        let changes: Vec<f64> = self
            .points
            .windows(2)
            .filter(|w| w[0].close != 0.0)
            .map(|w| w[1].close / w[0].close - 1.0)
            .collect();

        if changes.len() < 2 {
            return None;
        }

        let n = changes.len() as f64;
        let mean = changes.iter().sum::<f64>() / n;
        let variance = changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(round2(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0))
    }
}

/// A fundamental figure that may be missing from provider data
///
/// Serialises as a number or `null`; displays as `N/A` when missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Metric {
    Value(f64),
    #[default]
    NotAvailable,
}

impl Metric {
    /// Round a raw provider value; missing or non-finite becomes `NotAvailable`
    pub fn rounded(raw: Option<f64>) -> Self {
        match raw {
            Some(v) if v.is_finite() => Self::Value(round2(v)),
            _ => Self::NotAvailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl From<Option<f64>> for Metric {
    fn from(raw: Option<f64>) -> Self {
        match raw {
            Some(v) if v.is_finite() => Self::Value(v),
            _ => Self::NotAvailable,
        }
    }
}

impl From<Metric> for Option<f64> {
    fn from(metric: Metric) -> Self {
        metric.value()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:.2}"),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// Price trend from the ordering of price, SMA50 and SMA200
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        })
    }
}

/// Price-derived signals for the latest session
///
/// Averages that need more history than the series holds are `None`.
/// Display values are rounded to 2 dp; `trend` and the RSI flags are derived
/// from the unrounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub latest_price: f64,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub rsi: Option<f64>,
    pub trend: Trend,
    pub overbought: bool,
    pub oversold: bool,
    /// Number of closes the indicators were computed from
    pub observations: usize,
}

impl TechnicalIndicators {
    /// Whether every window had enough history
    pub fn has_full_history(&self) -> bool {
        self.sma50.is_some() && self.sma200.is_some() && self.rsi.is_some()
    }
}

/// Company fundamentals, each rounded or explicitly missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalMetrics {
    pub pe_ratio: Metric,
    pub pb_ratio: Metric,
    pub eps: Metric,
    pub debt_to_equity: Metric,
    pub roe: Metric,
}

/// Sector and industry context for the company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorInsights {
    pub sector: String,
    pub industry: String,
    /// ETF used as the sector proxy
    pub sector_etf: String,
    /// Percent return of the sector proxy over the lookback
    pub sector_return: Option<f64>,
    pub sector_pe: Metric,
    pub industry_trends: NarrativeOutcome,
}

/// Market-wide context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInsights {
    pub benchmark: String,
    /// Percent return of the benchmark over the lookback
    pub market_return: Option<f64>,
    /// Annualised volatility of the benchmark, percent
    pub volatility: Option<f64>,
    pub economic_outlook: NarrativeOutcome,
}

/// Discrete recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Buy,
    Hold,
    Sell,
}

impl Verdict {
    /// Map a 0..=3 score to a verdict; 2 and above is a buy
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => Self::Sell,
            1 => Self::Hold,
            _ => Self::Buy,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
        })
    }
}

/// Final output of one ticker analysis; read-only once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    symbol: String,
    verdict: Verdict,
    score: u8,
    target_price: f64,
    current_price: f64,
    horizon_months: u32,
}

impl Recommendation {
    pub(crate) fn new(
        symbol: impl Into<String>,
        verdict: Verdict,
        score: u8,
        target_price: f64,
        current_price: f64,
        horizon_months: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            verdict,
            score,
            target_price,
            current_price,
            horizon_months,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn target_price(&self) -> f64 {
        self.target_price
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    /// Human readable horizon, e.g. "3 months"
    pub fn time_horizon(&self) -> String {
        format!("{} months", self.horizon_months)
    }

    /// Percent distance from current to target price
    pub fn upside_pct(&self) -> Option<f64> {
        (self.current_price != 0.0)
            .then(|| round2((self.target_price / self.current_price - 1.0) * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + chrono::Days::new(i as u64), c))
            .collect();
        PriceSeries::new("TEST", points)
    }

    #[test]
    fn test_series_sorted_and_filtered() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let s = PriceSeries::new(
            "X",
            vec![
                PricePoint::new(d1, 2.0),
                PricePoint::new(d2, 1.0),
                PricePoint::new(d3, f64::NAN),
            ],
        );
        assert_eq!(s.closes(), vec![1.0, 2.0]);
        assert_eq!(s.latest_close(), Some(2.0));
    }

    #[test]
    fn test_period_return() {
        assert_eq!(series(&[100.0, 90.0, 112.5]).period_return_pct(), Some(12.5));
        assert_eq!(series(&[100.0]).period_return_pct(), None);
        assert_eq!(series(&[0.0, 5.0]).period_return_pct(), None);
    }

    #[test]
    fn test_volatility() {
        // Alternating +1% / -1% has a sample stddev just above 0.0115
        let vol = series(&[100.0, 101.0, 99.99, 100.9899]).annualized_volatility_pct().unwrap();
        assert!(vol > 15.0 && vol < 20.0, "vol = {vol}");

        assert_eq!(series(&[100.0, 100.0, 100.0]).annualized_volatility_pct(), Some(0.0));
        assert_eq!(series(&[100.0, 101.0]).annualized_volatility_pct(), None);
    }

    #[test]
    fn test_metric_rounding_and_display() {
        assert_eq!(Metric::rounded(Some(28.456)), Metric::Value(28.46));
        assert_eq!(Metric::rounded(Some(f64::NAN)), Metric::NotAvailable);
        assert_eq!(Metric::rounded(None), Metric::NotAvailable);
        assert_eq!(Metric::Value(3.0).to_string(), "3.00");
        assert_eq!(Metric::NotAvailable.to_string(), "N/A");
    }

    #[test]
    fn test_metric_serde() {
        assert_eq!(serde_json::to_string(&Metric::Value(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Metric::NotAvailable).unwrap(), "null");
        let parsed: Metric = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Metric::NotAvailable);
    }

    #[test]
    fn test_verdict_mapping() {
        assert_eq!(Verdict::from_score(0), Verdict::Sell);
        assert_eq!(Verdict::from_score(1), Verdict::Hold);
        assert_eq!(Verdict::from_score(2), Verdict::Buy);
        assert_eq!(Verdict::from_score(3), Verdict::Buy);
    }

    #[test]
    fn test_recommendation_accessors() {
        let rec = Recommendation::new("AAPL", Verdict::Hold, 1, 110.0, 100.0, 3);
        assert_eq!(rec.time_horizon(), "3 months");
        assert_eq!(rec.upside_pct(), Some(10.0));
        assert_eq!(rec.verdict().to_string(), "Hold");
    }
}
