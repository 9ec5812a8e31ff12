//! Alpha Vantage API client
//!
//! Used for company profiles: sector, industry and the fundamental ratios
//! Yahoo's chart API does not carry. Alpha Vantage reports missing numbers
//! as `"None"` or `"-"`; those become `None` here.

use crate::error::{Result, StockError};
use crate::provider::CompanyProfile;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

/// Company overview data, as returned by the OVERVIEW function
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CompanyOverview {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    pub price_to_book_ratio: Option<String>,
    #[serde(rename = "EPS")]
    pub eps: Option<String>,
    #[serde(rename = "ReturnOnEquityTTM")]
    pub return_on_equity: Option<String>,
}

impl CompanyOverview {
    /// Convert into a profile, leaving debt-to-equity for the balance sheet
    pub fn into_profile(self, symbol: &str) -> CompanyProfile {
        CompanyProfile {
            symbol: symbol.to_string(),
            name: parse_text(self.name),
            sector: parse_text(self.sector),
            industry: parse_text(self.industry),
            pe_ratio: parse_number(self.pe_ratio.as_deref()),
            pb_ratio: parse_number(self.price_to_book_ratio.as_deref()),
            eps: parse_number(self.eps.as_deref()),
            debt_to_equity: None,
            roe: parse_number(self.return_on_equity.as_deref()),
        }
    }
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client with API key and rate limit
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (5 on the free tier)
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let per_minute = NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    async fn query(&self, function: &str, symbol: &str) -> Result<Value> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", function),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StockError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        check_api_message(&data)?;
        Ok(data)
    }

    /// Get company overview
    #[instrument(skip(self))]
    pub async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        let data = self.query("OVERVIEW", symbol).await?;
        debug!("Fetched company overview");
        Ok(serde_json::from_value(data)?)
    }

    /// Debt-to-equity (percent) from the latest balance sheet
    #[instrument(skip(self))]
    pub async fn debt_to_equity(&self, symbol: &str) -> Result<Option<f64>> {
        let data = self.query("BALANCE_SHEET", symbol).await?;
        Ok(latest_debt_to_equity(&data))
    }
}

/// Map Alpha Vantage's in-band messages to errors
fn check_api_message(data: &Value) -> Result<()> {
    if let Some(error) = data.get("Error Message") {
        return Err(StockError::AlphaVantageError(error.to_string()));
    }
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(StockError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
        });
    }
    Ok(())
}

fn latest_debt_to_equity(data: &Value) -> Option<f64> {
    ["quarterlyReports", "annualReports"]
        .iter()
        .filter_map(|key| data.get(*key)?.as_array()?.first())
        .find_map(|report| {
            let debt = parse_number(report.get("shortLongTermDebtTotal")?.as_str())?;
            let equity = parse_number(report.get("totalShareholderEquity")?.as_str())?;
            (equity != 0.0).then(|| debt / equity * 100.0)
        })
}

/// Parse an Alpha Vantage numeric string
pub(crate) fn parse_number(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "-" || raw.eq_ignore_ascii_case("none") {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "-" && !s.eq_ignore_ascii_case("none"))
}
