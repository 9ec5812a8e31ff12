//! Analysis orchestrator
//!
//! Runs the four sub-analyses for a ticker in order (market, sector,
//! fundamentals, technicals), then values and scores the result. Collaborator
//! failures degrade the affected field; only a missing price series for the
//! ticker itself fails the analysis.

use analyst_llm::NarrativeProvider;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::AnalystConfig;
use crate::error::Result;
use crate::indicators::compute_indicators;
use crate::model::{
    FundamentalMetrics, MarketInsights, Metric, Recommendation, SectorInsights,
    TechnicalIndicators,
};
use crate::narrative::NarrativeOutcome;
use crate::prompts::{PromptLibrary, RenderedPrompt};
use crate::provider::{CompanyProfile, MarketDataProvider, normalize_symbol};
use crate::report::{AnalysisReport, TickerOutcome};
use crate::scoring::ScoreCard;
use crate::sector::sector_proxy;
use crate::valuation::ValuationModel;

/// Label for a sector or industry the profile does not carry
pub const UNKNOWN_LABEL: &str = "Unknown";

const UNAVAILABLE_COMMENTARY: &str = "Commentary unavailable.";

/// Produces one recommendation per ticker from injected collaborators
pub struct FinancialAnalyst {
    market_data: Arc<dyn MarketDataProvider>,
    narrator: Arc<dyn NarrativeProvider>,
    config: Arc<AnalystConfig>,
    valuation: ValuationModel,
    prompts: PromptLibrary,
}

impl FinancialAnalyst {
    /// Create an analyst; fails only on invalid configuration
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        narrator: Arc<dyn NarrativeProvider>,
        config: AnalystConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            market_data,
            narrator,
            valuation: ValuationModel::from_config(&config),
            config: Arc::new(config),
            prompts: PromptLibrary::new()?,
        })
    }

    pub fn config(&self) -> &AnalystConfig {
        &self.config
    }

    /// Analyze one ticker
    #[instrument(skip_all, fields(symbol = %ticker))]
    pub async fn analyze(&self, ticker: &str) -> Result<AnalysisReport> {
        let symbol = normalize_symbol(ticker)?;
        info!("Starting analysis");

        let market = self.market_insights().await;
        let profile = self.company_profile(&symbol).await;
        let sector = self.sector_insights(&profile).await;
        let (fundamentals, company_outlook) = self.fundamental_analysis(&symbol, &profile).await;
        let technicals = self.technical_analysis(&symbol).await?;

        let target_price = self.valuation.target_price(
            technicals.latest_price,
            fundamentals.pe_ratio,
            fundamentals.eps,
            technicals.trend,
        );
        let score_card = ScoreCard::evaluate(
            fundamentals.pe_ratio,
            sector.sector_pe,
            technicals.trend,
            sector.sector_return,
            market.market_return,
        );
        let recommendation = Recommendation::new(
            &symbol,
            score_card.verdict(),
            score_card.score(),
            target_price,
            technicals.latest_price,
            self.config.horizon_months,
        );

        info!(
            verdict = %recommendation.verdict(),
            score = recommendation.score(),
            target_price,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            symbol,
            market,
            sector,
            fundamentals,
            company_outlook,
            technicals,
            score_card,
            recommendation,
        })
    }

    /// Analyze tickers in input order
    ///
    /// At most `max_concurrency` analyses are in flight; with the default of
    /// one, each ticker finishes before the next starts. A failed ticker is
    /// reported in place and does not stop the batch.
    pub async fn analyze_batch(&self, tickers: &[String]) -> Vec<TickerOutcome> {
        let workers = self.config.max_concurrency.max(1);
        info!(count = tickers.len(), workers, "Starting batch analysis");

        stream::iter(tickers)
            .map(|ticker| async move {
                let result = self.analyze(ticker).await;
                if let Err(e) = &result {
                    warn!(ticker = %ticker, error = %e, "Ticker analysis failed");
                }
                TickerOutcome {
                    symbol: ticker.trim().to_uppercase(),
                    result,
                }
            })
            .buffered(workers)
            .collect()
            .await
    }

    /// Benchmark return, volatility and economic outlook
    pub async fn market_insights(&self) -> MarketInsights {
        let benchmark = &self.config.market_benchmark;
        let (market_return, volatility) = match self
            .market_data
            .price_history(benchmark, self.config.lookback)
            .await
        {
            Ok(series) => (series.period_return_pct(), series.annualized_volatility_pct()),
            Err(e) => {
                warn!(benchmark = %benchmark, error = %e, "Benchmark history unavailable");
                (None, None)
            }
        };

        let economic_outlook = self
            .narrate(self.prompts.economic_outlook(self.config.horizon_months))
            .await;

        MarketInsights {
            benchmark: benchmark.clone(),
            market_return,
            volatility,
            economic_outlook,
        }
    }

    /// Sector proxy performance, sector valuation and industry commentary
    pub async fn sector_insights(&self, profile: &CompanyProfile) -> SectorInsights {
        let sector = profile.sector.clone().unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        let industry = profile.industry.clone().unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        let sector_etf =
            sector_proxy(profile.sector.as_deref(), &self.config.fallback_sector_etf).to_string();
        debug!(sector = %sector, etf = %sector_etf, "Resolved sector proxy");

        let sector_return = match self
            .market_data
            .price_history(&sector_etf, self.config.lookback)
            .await
        {
            Ok(series) => series.period_return_pct(),
            Err(e) => {
                warn!(etf = %sector_etf, error = %e, "Sector history unavailable");
                None
            }
        };

        let sector_pe = match self.market_data.company_profile(&sector_etf).await {
            Ok(etf) => Metric::rounded(etf.pe_ratio),
            Err(e) => {
                warn!(etf = %sector_etf, error = %e, "Sector profile unavailable");
                Metric::NotAvailable
            }
        };
        if !sector_pe.is_available() {
            warn!(etf = %sector_etf, "Sector PE not available, relative valuation will not score");
        }

        let industry_trends = self
            .narrate(
                self.prompts
                    .industry_trends(&industry, self.config.horizon_months),
            )
            .await;

        SectorInsights {
            sector,
            industry,
            sector_etf,
            sector_return,
            sector_pe,
            industry_trends,
        }
    }

    /// Rounded ratios from the profile plus a qualitative evaluation
    pub async fn fundamental_analysis(
        &self,
        symbol: &str,
        profile: &CompanyProfile,
    ) -> (FundamentalMetrics, NarrativeOutcome) {
        let metrics = FundamentalMetrics {
            pe_ratio: Metric::rounded(profile.pe_ratio),
            pb_ratio: Metric::rounded(profile.pb_ratio),
            eps: Metric::rounded(profile.eps),
            debt_to_equity: Metric::rounded(profile.debt_to_equity),
            roe: Metric::rounded(profile.roe),
        };

        if !metrics.pe_ratio.is_available() || !metrics.eps.is_available() {
            warn!(symbol, "PE or EPS not available, valuation will use the fallback markup");
        }

        let outlook = self.narrate(self.prompts.company_evaluation(symbol)).await;
        (metrics, outlook)
    }

    /// Indicators from the ticker's own price series
    ///
    /// This is the one step whose failure fails the ticker: without a
    /// series there is no current price.
    pub async fn technical_analysis(&self, symbol: &str) -> Result<TechnicalIndicators> {
        let series = self
            .market_data
            .price_history(symbol, self.config.lookback)
            .await?;
        compute_indicators(&series)
    }

    async fn company_profile(&self, symbol: &str) -> CompanyProfile {
        match self.market_data.company_profile(symbol).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(symbol, error = %e, "Company profile unavailable");
                CompanyProfile::unavailable(symbol)
            }
        }
    }

    async fn narrate(&self, prompt: Result<RenderedPrompt>) -> NarrativeOutcome {
        let rendered = match prompt {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(error = %e, "Prompt rendering failed");
                return NarrativeOutcome::fallback(UNAVAILABLE_COMMENTARY, e);
            }
        };

        match self.narrator.generate(&rendered.prompt).await {
            Ok(text) => NarrativeOutcome::generated(text),
            Err(e) => {
                warn!(error = %e, "Narrative request failed, using fallback text");
                NarrativeOutcome::fallback(&rendered.fallback, e)
            }
        }
    }
}
