//! Per-ticker analysis results

use serde::{Deserialize, Serialize};

use crate::error::StockError;
use crate::model::{FundamentalMetrics, MarketInsights, Recommendation, SectorInsights, TechnicalIndicators};
use crate::narrative::NarrativeOutcome;
use crate::scoring::ScoreCard;

/// Everything produced while analyzing one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub market: MarketInsights,
    pub sector: SectorInsights,
    pub fundamentals: FundamentalMetrics,
    /// Qualitative company evaluation
    pub company_outlook: NarrativeOutcome,
    pub technicals: TechnicalIndicators,
    /// Which criteria contributed to the score
    pub score_card: ScoreCard,
    pub recommendation: Recommendation,
}

impl AnalysisReport {
    /// Narrative sections that fell back to default text
    pub fn fallback_sections(&self) -> Vec<&'static str> {
        [
            ("economic_outlook", &self.market.economic_outlook),
            ("industry_trends", &self.sector.industry_trends),
            ("company_outlook", &self.company_outlook),
        ]
        .into_iter()
        .filter(|(_, outcome)| outcome.is_fallback())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Result of one entry in a batch run
#[derive(Debug)]
pub struct TickerOutcome {
    /// Ticker as requested, upper-cased
    pub symbol: String,
    pub result: Result<AnalysisReport, StockError>,
}

impl TickerOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&StockError> {
        self.result.as_ref().err()
    }
}
