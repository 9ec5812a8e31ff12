//! Three-signal scoring rule

use serde::{Deserialize, Serialize};

use crate::model::{Metric, Trend, Verdict};

/// The three independent signals behind a verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Company PE below sector PE (both must be known)
    pub cheaper_than_sector: bool,
    /// Price trend is bullish; neutral and bearish score the same
    pub bullish_trend: bool,
    /// Sector return strictly above market return (both must be known)
    pub sector_outperforms: bool,
}

impl ScoreCard {
    pub fn evaluate(
        company_pe: Metric,
        sector_pe: Metric,
        trend: Trend,
        sector_return: Option<f64>,
        market_return: Option<f64>,
    ) -> Self {
        let cheaper_than_sector = match (company_pe.value(), sector_pe.value()) {
            (Some(company), Some(sector)) => company < sector,
            _ => false,
        };

        let sector_outperforms = match (sector_return, market_return) {
            (Some(sector), Some(market)) => sector > market,
            _ => false,
        };

        Self {
            cheaper_than_sector,
            bullish_trend: trend == Trend::Bullish,
            sector_outperforms,
        }
    }

    /// Number of true signals, 0..=3
    pub fn score(&self) -> u8 {
        u8::from(self.cheaper_than_sector)
            + u8::from(self.bullish_trend)
            + u8::from(self.sector_outperforms)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.score())
    }
}
