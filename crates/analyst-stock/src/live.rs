//! Live market data: Yahoo Finance series plus Alpha Vantage profiles
//!
//! Alpha Vantage OVERVIEW has nothing for ETFs, so valuation fields it
//! leaves empty are filled from Yahoo's key statistics. That is where sector
//! ETF PE ratios come from.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{AlphaVantageClient, YahooFinanceClient};
use crate::cache::{CacheKey, ResponseCache};
use crate::config::{AnalystConfig, LookbackPeriod};
use crate::error::Result;
use crate::model::PriceSeries;
use crate::provider::{CompanyProfile, MarketDataProvider};

/// Market-data provider backed by public APIs
///
/// Without an Alpha Vantage key only the Yahoo valuation fields (PE, EPS,
/// price-to-book) are available; the rest are reported as not available.
pub struct LiveMarketData {
    yahoo: YahooFinanceClient,
    alpha_vantage: Option<AlphaVantageClient>,
    series_cache: ResponseCache<PriceSeries>,
    profile_cache: ResponseCache<CompanyProfile>,
}

impl LiveMarketData {
    /// Create a provider from the analyst configuration
    pub fn from_config(config: &AnalystConfig) -> Result<Self> {
        let yahoo = YahooFinanceClient::new(config.request_timeout)?;
        let alpha_vantage = config
            .alpha_vantage_api_key
            .as_ref()
            .map(|key| {
                AlphaVantageClient::new(
                    key.clone(),
                    config.alpha_vantage_rate_limit,
                    config.request_timeout,
                )
            })
            .transpose()?;

        if alpha_vantage.is_none() {
            warn!("ALPHA_VANTAGE_API_KEY not set, only Yahoo valuation figures are available");
        }

        Ok(Self {
            yahoo,
            alpha_vantage,
            series_cache: ResponseCache::new(config.cache_ttl),
            profile_cache: ResponseCache::new(config.cache_ttl),
        })
    }

    /// Whether Alpha Vantage profiles are fetched
    pub fn has_alpha_vantage(&self) -> bool {
        self.alpha_vantage.is_some()
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let mut profile = match &self.alpha_vantage {
            Some(client) => alpha_vantage_profile(client, symbol).await?,
            None => CompanyProfile::unavailable(symbol),
        };

        if lacks_valuation(&profile) {
            match self.yahoo.key_statistics(symbol).await {
                Ok(stats) => stats.fill_missing(&mut profile),
                Err(e) => warn!(symbol, error = %e, "Yahoo key statistics unavailable"),
            }
        }

        Ok(profile)
    }
}

async fn alpha_vantage_profile(
    client: &AlphaVantageClient,
    symbol: &str,
) -> Result<CompanyProfile> {
    let mut profile = client.company_overview(symbol).await?.into_profile(symbol);

    // ETFs and unknown symbols come back as `{}`; no balance sheet either
    if profile.name.is_none() {
        debug!(symbol, "Empty Alpha Vantage overview");
        return Ok(profile);
    }

    match client.debt_to_equity(symbol).await {
        Ok(ratio) => profile.debt_to_equity = ratio,
        Err(e) => warn!(symbol, error = %e, "Balance sheet unavailable"),
    }

    Ok(profile)
}

fn lacks_valuation(profile: &CompanyProfile) -> bool {
    profile.pe_ratio.is_none() || profile.eps.is_none() || profile.pb_ratio.is_none()
}

#[async_trait]
impl MarketDataProvider for LiveMarketData {
    async fn price_history(&self, symbol: &str, period: LookbackPeriod) -> Result<PriceSeries> {
        self.series_cache
            .get_or_fetch(CacheKey::series(symbol, period), || {
                self.yahoo.daily_closes(symbol, period)
            })
            .await
    }

    async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        self.profile_cache
            .get_or_fetch(CacheKey::profile(symbol), || self.fetch_profile(symbol))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_key_uses_yahoo_only() {
        let provider = LiveMarketData::from_config(&AnalystConfig::default()).unwrap();
        assert!(!provider.has_alpha_vantage());
    }

    #[test]
    fn test_empty_etf_overview_needs_valuation() {
        // What Alpha Vantage OVERVIEW yields for XLK
        assert!(lacks_valuation(&CompanyProfile::unavailable("XLK")));

        let complete = CompanyProfile {
            pe_ratio: Some(29.1),
            pb_ratio: Some(45.0),
            eps: Some(6.4),
            ..CompanyProfile::unavailable("AAPL")
        };
        assert!(!lacks_valuation(&complete));
        assert!(lacks_valuation(&CompanyProfile {
            pb_ratio: None,
            ..complete
        }));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_sector_etf_profile_has_pe() {
        let provider = LiveMarketData::from_config(&AnalystConfig::default()).unwrap();
        let profile = provider.company_profile("XLK").await.unwrap();
        assert!(profile.pe_ratio.is_some());
        assert!(profile.sector.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_benchmark_series_is_cached() {
        let provider = LiveMarketData::from_config(&AnalystConfig::default()).unwrap();
        let first = provider.price_history("^GSPC", LookbackPeriod::OneYear).await.unwrap();
        let second = provider.price_history("^GSPC", LookbackPeriod::OneYear).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(provider.series_cache.len().await, 1);
    }
}
