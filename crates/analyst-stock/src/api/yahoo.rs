//! Yahoo Finance API client
//!
//! Daily history comes from the chart API through `yahoo_finance_api`.
//! Valuation figures (trailing PE, EPS, price-to-book) come from the
//! quoteSummary endpoint, which covers ETFs as well as single stocks and
//! needs a session cookie plus crumb.

use crate::config::LookbackPeriod;
use crate::error::{Result, StockError};
use crate::model::{PricePoint, PriceSeries};
use crate::provider::CompanyProfile;
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

/// Daily bar interval requested from Yahoo
const DAILY_INTERVAL: &str = "1d";

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "summaryDetail,defaultKeyStatistics";
const REFERER: &str = "https://finance.yahoo.com/";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
Chrome/124.0 Safari/537.36";

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    http: Client,
    crumb: Mutex<Option<String>>,
    timeout: Duration,
}

/// Valuation figures from quoteSummary; any of them may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyStatistics {
    pub trailing_pe: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub price_to_book: Option<f64>,
}

impl KeyStatistics {
    /// Read `{ "raw": .. }` values out of a quoteSummary response
    pub fn from_quote_summary(data: &Value) -> Self {
        let result = data.pointer("/quoteSummary/result/0");
        let raw = |path: &str| {
            result
                .and_then(|r| r.pointer(path))
                .and_then(|v| v.get("raw"))
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite())
        };

        Self {
            trailing_pe: raw("/summaryDetail/trailingPE"),
            trailing_eps: raw("/defaultKeyStatistics/trailingEps"),
            price_to_book: raw("/defaultKeyStatistics/priceToBook"),
        }
    }

    /// Fill fields the profile lacks; present fields are kept
    pub fn fill_missing(self, profile: &mut CompanyProfile) {
        profile.pe_ratio = profile.pe_ratio.or(self.trailing_pe);
        profile.eps = profile.eps.or(self.trailing_eps);
        profile.pb_ratio = profile.pb_ratio.or(self.price_to_book);
    }
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(timeout: Duration) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;
        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            connector,
            http,
            crumb: Mutex::new(None),
            timeout,
        })
    }

    /// Get dividend- and split-adjusted daily closes for a symbol over `period`
    #[instrument(skip(self), fields(range = period.as_range()))]
    pub async fn daily_closes(&self, symbol: &str, period: LookbackPeriod) -> Result<PriceSeries> {
        let request = self
            .connector
            .get_quote_range(symbol, DAILY_INTERVAL, period.as_range());

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                StockError::YahooFinanceError(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| daily_point(q.timestamp as i64, q.close, q.adjclose))
            .collect();

        debug!(observations = points.len(), "Fetched daily closes");

        if points.is_empty() {
            return Err(StockError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "No historical data available".to_string(),
            });
        }

        Ok(PriceSeries::new(symbol, points))
    }

    /// Trailing PE, EPS and price-to-book for a stock or ETF
    #[instrument(skip(self))]
    pub async fn key_statistics(&self, symbol: &str) -> Result<KeyStatistics> {
        let crumb = self.crumb().await?;

        let response = self
            .http
            .get(format!("{QUOTE_SUMMARY_URL}/{symbol}"))
            .header(reqwest::header::REFERER, REFERER)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .send()
            .await?;

        let status = response.status();
        if matches!(status.as_u16(), 401 | 403) {
            // Stale session; the next call fetches a new crumb
            self.crumb.lock().await.take();
        }
        if !status.is_success() {
            return Err(StockError::YahooFinanceError(format!(
                "quoteSummary HTTP error: {status}"
            )));
        }

        let data: Value = response.json().await?;
        let stats = KeyStatistics::from_quote_summary(&data);
        debug!(trailing_pe = ?stats.trailing_pe, "Fetched key statistics");
        Ok(stats)
    }

    /// Session crumb, fetched once and reused
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Only the session cookie matters here, not the response
        let _ = self
            .http
            .get(COOKIE_URL)
            .header(reqwest::header::REFERER, REFERER)
            .send()
            .await;

        let body = self
            .http
            .get(CRUMB_URL)
            .header(reqwest::header::REFERER, REFERER)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let crumb = parse_crumb(&body).ok_or_else(|| {
            StockError::YahooFinanceError("could not obtain a session crumb".to_string())
        })?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }
}

/// One daily point, preferring the adjusted close
///
/// Falls back to the raw close when Yahoo has no usable adjusted value.
fn daily_point(timestamp: i64, close: f64, adjclose: f64) -> Option<PricePoint> {
    let value = if adjclose.is_finite() && adjclose > 0.0 {
        adjclose
    } else {
        close
    };
    DateTime::from_timestamp(timestamp, 0).map(|ts| PricePoint::new(ts.date_naive(), value))
}

fn parse_crumb(body: &str) -> Option<String> {
    let crumb = body.trim();
    let valid = !crumb.is_empty()
        && crumb.len() < 100
        && !crumb.contains(char::is_whitespace)
        && !crumb.contains('<')
        && !crumb.to_ascii_lowercase().contains("too many requests");
    valid.then(|| crumb.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JAN_2: i64 = 1_704_153_600;
    const DEC_31: i64 = 1_735_603_200;

    #[test]
    fn test_series_uses_adjusted_close() {
        let points = vec![
            daily_point(JAN_2, 100.0, 97.0).unwrap(),
            daily_point(DEC_31, 110.0, 110.0).unwrap(),
        ];
        let series = PriceSeries::new("XLU", points);

        assert_eq!(series.closes(), vec![97.0, 110.0]);
        // Dividends paid during the year count toward the return
        assert_eq!(series.period_return_pct(), Some(13.4));
    }

    #[test]
    fn test_missing_adjusted_close_falls_back() {
        assert_eq!(daily_point(JAN_2, 100.0, f64::NAN).unwrap().close, 100.0);
        assert_eq!(daily_point(JAN_2, 100.0, 0.0).unwrap().close, 100.0);
        assert_eq!(
            daily_point(JAN_2, 100.0, 99.5).unwrap().date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_key_statistics_from_etf_summary() {
        let data = json!({
            "quoteSummary": {
                "result": [{
                    "summaryDetail": {
                        "trailingPE": {"raw": 38.27, "fmt": "38.27"},
                        "forwardPE": {}
                    },
                    "defaultKeyStatistics": {
                        "trailingEps": {},
                        "priceToBook": {"raw": 9.1, "fmt": "9.10"}
                    }
                }],
                "error": null
            }
        });

        let stats = KeyStatistics::from_quote_summary(&data);
        assert_eq!(stats.trailing_pe, Some(38.27));
        assert_eq!(stats.trailing_eps, None);
        assert_eq!(stats.price_to_book, Some(9.1));
    }

    #[test]
    fn test_key_statistics_from_error_response() {
        let data = json!({"quoteSummary": {"result": null, "error": {"code": "Not Found"}}});
        assert_eq!(KeyStatistics::from_quote_summary(&data), KeyStatistics::default());
    }

    #[test]
    fn test_fill_missing_keeps_existing_fields() {
        let mut profile = CompanyProfile {
            pe_ratio: Some(22.4),
            ..CompanyProfile::unavailable("IBM")
        };
        KeyStatistics {
            trailing_pe: Some(25.0),
            trailing_eps: Some(8.1),
            price_to_book: None,
        }
        .fill_missing(&mut profile);

        assert_eq!(profile.pe_ratio, Some(22.4));
        assert_eq!(profile.eps, Some(8.1));
        assert_eq!(profile.pb_ratio, None);
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("  abc.DEF/123\n"), Some("abc.DEF/123".to_string()));
        assert_eq!(parse_crumb(""), None);
        assert_eq!(parse_crumb("Too Many Requests"), None);
        assert_eq!(parse_crumb("<html><body>denied</body></html>"), None);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_daily_closes() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        let series = client.daily_closes("AAPL", LookbackPeriod::OneYear).await.unwrap();

        assert_eq!(series.symbol(), "AAPL");
        assert!(series.len() > 200);
        assert!(series.latest_close().unwrap() > 0.0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_symbol_fails() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        assert!(
            client
                .daily_closes("INVALID_SYMBOL_12345", LookbackPeriod::OneYear)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_sector_etf_trailing_pe() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        let stats = client.key_statistics("XLK").await.unwrap();
        assert!(stats.trailing_pe.is_some());
    }
}
