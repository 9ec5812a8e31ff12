//! Target price model
//!
//! Forward earnings multiple when PE and EPS are both known, a flat markup
//! on the current price otherwise, then a nudge in the direction of the
//! price trend. There is no error path.

use serde::{Deserialize, Serialize};

use crate::config::{AnalystConfig, DEFAULT_DISCOUNT_RATE, DEFAULT_GROWTH_RATE};
use crate::model::{Metric, Trend, round2};

/// Markup applied to the current price when fundamentals are missing
pub const FALLBACK_MARKUP: f64 = 1.10;
/// Multiplier for a bullish trend
pub const BULLISH_ADJUSTMENT: f64 = 1.05;
/// Multiplier for a bearish trend
pub const BEARISH_ADJUSTMENT: f64 = 0.95;

/// Heuristic valuation with fixed growth and discount rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationModel {
    pub growth_rate: f64,
    pub discount_rate: f64,
}

impl Default for ValuationModel {
    fn default() -> Self {
        Self::new(DEFAULT_GROWTH_RATE, DEFAULT_DISCOUNT_RATE)
    }
}

impl ValuationModel {
    pub fn new(growth_rate: f64, discount_rate: f64) -> Self {
        Self {
            growth_rate,
            discount_rate,
        }
    }

    pub fn from_config(config: &AnalystConfig) -> Self {
        Self::new(config.growth_rate, config.discount_rate)
    }

    /// Target before the trend adjustment, unrounded
    pub fn base_target(&self, current_price: f64, pe_ratio: Metric, eps: Metric) -> f64 {
        match (pe_ratio.value(), eps.value()) {
            (Some(pe), Some(eps)) => {
                let forward_eps = eps * (1.0 + self.growth_rate);
                forward_eps * pe / (1.0 + self.discount_rate)
            }
            _ => current_price * FALLBACK_MARKUP,
        }
    }

    /// Target price rounded to 2 dp
    pub fn target_price(&self, current_price: f64, pe_ratio: Metric, eps: Metric, trend: Trend) -> f64 {
        let base = self.base_target(current_price, pe_ratio, eps);
        let adjusted = match trend {
            Trend::Bullish => base * BULLISH_ADJUSTMENT,
            Trend::Bearish => base * BEARISH_ADJUSTMENT,
            Trend::Neutral => base,
        };
        round2(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_when_pe_missing() {
        let model = ValuationModel::default();
        let pe = Metric::NotAvailable;
        let eps = Metric::Value(5.0);

        assert_eq!(model.target_price(100.0, pe, eps, Trend::Neutral), 110.0);
        assert_eq!(model.target_price(100.0, pe, eps, Trend::Bullish), 115.5);
        assert_eq!(model.target_price(100.0, pe, eps, Trend::Bearish), 104.5);
    }

    #[test]
    fn test_fallback_when_eps_missing() {
        let model = ValuationModel::default();
        let target = model.target_price(50.0, Metric::Value(20.0), Metric::NotAvailable, Trend::Neutral);
        assert_eq!(target, 55.0);
    }

    #[test]
    fn test_forward_earnings_path() {
        let model = ValuationModel::default();
        let pe = Metric::Value(20.0);
        let eps = Metric::Value(5.0);

        let base = model.base_target(100.0, pe, eps);
        assert!((base - 5.25 * 20.0 / 1.10).abs() < 1e-9);
        assert_eq!(model.target_price(100.0, pe, eps, Trend::Neutral), 95.45);
        assert_eq!(model.target_price(100.0, pe, eps, Trend::Bullish), 100.23);
        assert_eq!(model.target_price(100.0, pe, eps, Trend::Bearish), 90.68);
    }

    #[test]
    fn test_custom_rates() {
        let model = ValuationModel::new(0.0, 0.0);
        let target = model.target_price(1.0, Metric::Value(10.0), Metric::Value(2.0), Trend::Neutral);
        assert_eq!(target, 20.0);
    }

    #[test]
    fn test_from_config() {
        let config = AnalystConfig::builder().growth_rate(0.08).build().unwrap();
        let model = ValuationModel::from_config(&config);
        assert!((model.growth_rate - 0.08).abs() < f64::EPSILON);
        assert!((model.discount_rate - 0.10).abs() < f64::EPSILON);
    }
}
