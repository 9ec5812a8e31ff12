//! Report formatting utilities

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;
use std::fmt::Write as _;

use crate::error::StockError;
use crate::model::Metric;
use crate::report::{AnalysisReport, TickerOutcome};

/// Output format selectable from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(StockError::ConfigError(format!("unknown output format: {other}"))),
        }
    }
}

impl OutputFormat {
    pub fn formatter(self, detailed: bool) -> Box<dyn ReportFormatter> {
        match self {
            Self::Text => Box::new(PlainTextFormatter { detailed }),
            Self::Table => Box::new(TableFormatter),
            Self::Json => Box::new(JsonFormatter),
        }
    }
}

pub trait ReportFormatter: Send + Sync {
    fn format_report(&self, report: &AnalysisReport) -> String;
    fn format_error(&self, symbol: &str, error: &StockError) -> String;

    /// Render a whole batch in input order
    fn format_batch(&self, outcomes: &[TickerOutcome]) -> String {
        outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => self.format_report(report),
                Err(e) => self.format_error(&outcome.symbol, e),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Human-readable summary, one block per ticker
#[derive(Debug, Default)]
pub struct PlainTextFormatter {
    /// Include the intermediate sections, not just the recommendation
    pub detailed: bool,
}

impl ReportFormatter for PlainTextFormatter {
    fn format_report(&self, report: &AnalysisReport) -> String {
        let rec = &report.recommendation;
        let mut out = String::new();

        let _ = writeln!(out, "=== Financial Analysis Summary for {} ===", report.symbol);
        let _ = writeln!(out, "Recommendation: {}", rec.verdict());
        let _ = writeln!(out, "Current Price: {:.2}", rec.current_price());
        let _ = writeln!(out, "Target Price: {:.2}", rec.target_price());
        let _ = writeln!(out, "Time Horizon: {}", rec.time_horizon());
        let _ = writeln!(out, "Trend: {}", report.technicals.trend);

        if self.detailed {
            let market = &report.market;
            let _ = writeln!(out, "\n--- Market ({}) ---", market.benchmark);
            let _ = writeln!(out, "Return: {}", percent(market.market_return));
            let _ = writeln!(out, "Volatility: {}", percent(market.volatility));
            let _ = writeln!(out, "Outlook: {}", market.economic_outlook);

            let sector = &report.sector;
            let _ = writeln!(out, "\n--- Sector: {} ({}) ---", sector.sector, sector.sector_etf);
            let _ = writeln!(out, "Industry: {}", sector.industry);
            let _ = writeln!(out, "Sector Return: {}", percent(sector.sector_return));
            let _ = writeln!(out, "Sector P/E: {}", sector.sector_pe);
            let _ = writeln!(out, "Trends: {}", sector.industry_trends);

            let f = &report.fundamentals;
            let _ = writeln!(out, "\n--- Fundamentals ---");
            let _ = writeln!(
                out,
                "P/E: {}  P/B: {}  EPS: {}  D/E: {}  ROE: {}",
                f.pe_ratio, f.pb_ratio, f.eps, f.debt_to_equity, f.roe
            );
            let _ = writeln!(out, "Outlook: {}", report.company_outlook);

            let t = &report.technicals;
            let _ = writeln!(out, "\n--- Technicals ---");
            let _ = writeln!(
                out,
                "SMA50: {}  SMA200: {}  RSI: {}",
                Metric::from(t.sma50),
                Metric::from(t.sma200),
                Metric::from(t.rsi)
            );
            if t.overbought {
                let _ = writeln!(out, "RSI signals overbought");
            } else if t.oversold {
                let _ = writeln!(out, "RSI signals oversold");
            }
            let _ = writeln!(out, "Score: {}/3", rec.score());
        }

        out
    }

    fn format_error(&self, symbol: &str, error: &StockError) -> String {
        format!("=== Financial Analysis Summary for {symbol} ===\nError: {error}\n")
    }
}

/// One row per ticker
#[derive(Debug, Default)]
pub struct TableFormatter;

const TABLE_HEADER: [&str; 9] = [
    "Ticker", "Verdict", "Score", "Current", "Target", "Upside", "Trend", "RSI", "Horizon",
];

impl TableFormatter {
    fn table() -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(TABLE_HEADER.to_vec());
        table
    }

    fn report_row(report: &AnalysisReport) -> Vec<String> {
        let rec = &report.recommendation;
        vec![
            report.symbol.clone(),
            rec.verdict().to_string(),
            rec.score().to_string(),
            format!("{:.2}", rec.current_price()),
            format!("{:.2}", rec.target_price()),
            percent(rec.upside_pct()),
            report.technicals.trend.to_string(),
            Metric::from(report.technicals.rsi).to_string(),
            rec.time_horizon(),
        ]
    }

    fn error_row(symbol: &str, error: &StockError) -> Vec<String> {
        let mut row = vec![symbol.to_string(), "Error".to_string()];
        row.extend(std::iter::repeat_n("-".to_string(), TABLE_HEADER.len() - 3));
        row.push(error.to_string());
        row
    }
}

impl ReportFormatter for TableFormatter {
    fn format_report(&self, report: &AnalysisReport) -> String {
        let mut table = Self::table();
        table.add_row(Self::report_row(report));
        table.to_string()
    }

    fn format_error(&self, symbol: &str, error: &StockError) -> String {
        let mut table = Self::table();
        table.add_row(Self::error_row(symbol, error));
        table.to_string()
    }

    fn format_batch(&self, outcomes: &[TickerOutcome]) -> String {
        let mut table = Self::table();
        for outcome in outcomes {
            let row = match &outcome.result {
                Ok(report) => Self::report_row(report),
                Err(e) => Self::error_row(&outcome.symbol, e),
            };
            table.add_row(row);
        }
        table.to_string()
    }
}

/// Machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    fn outcome_value(outcome: &TickerOutcome) -> serde_json::Value {
        match &outcome.result {
            Ok(report) => json!({ "symbol": outcome.symbol, "status": "ok", "report": report }),
            Err(e) => json!({ "symbol": outcome.symbol, "status": "error", "error": e.to_string() }),
        }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }

    fn format_error(&self, symbol: &str, error: &StockError) -> String {
        json!({ "symbol": symbol, "status": "error", "error": error.to_string() }).to_string()
    }

    fn format_batch(&self, outcomes: &[TickerOutcome]) -> String {
        let values: Vec<_> = outcomes.iter().map(Self::outcome_value).collect();
        serde_json::to_string_pretty(&values).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}%"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        FundamentalMetrics, MarketInsights, Recommendation, SectorInsights, TechnicalIndicators,
        Trend, Verdict,
    };
    use crate::narrative::NarrativeOutcome;
    use crate::scoring::ScoreCard;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            symbol: "AAPL".to_string(),
            market: MarketInsights {
                benchmark: "^GSPC".to_string(),
                market_return: Some(10.0),
                volatility: Some(15.5),
                economic_outlook: NarrativeOutcome::generated("Rates are steady."),
            },
            sector: SectorInsights {
                sector: "Technology".to_string(),
                industry: "Consumer Electronics".to_string(),
                sector_etf: "XLK".to_string(),
                sector_return: Some(12.0),
                sector_pe: Metric::Value(30.0),
                industry_trends: NarrativeOutcome::fallback(
                    "Consumer Electronics shows steady growth.",
                    "HTTP 500",
                ),
            },
            fundamentals: FundamentalMetrics {
                pe_ratio: Metric::Value(28.5),
                eps: Metric::Value(6.1),
                ..FundamentalMetrics::default()
            },
            company_outlook: NarrativeOutcome::generated("Strong brand."),
            technicals: TechnicalIndicators {
                latest_price: 150.0,
                sma50: Some(145.0),
                sma200: Some(140.0),
                rsi: Some(62.5),
                trend: Trend::Bullish,
                overbought: false,
                oversold: false,
                observations: 252,
            },
            score_card: ScoreCard {
                cheaper_than_sector: true,
                bullish_trend: true,
                sector_outperforms: true,
            },
            recommendation: Recommendation::new("AAPL", Verdict::Buy, 3, 175.5, 150.0, 3),
        }
    }

    fn failed(symbol: &str) -> TickerOutcome {
        TickerOutcome {
            symbol: symbol.to_string(),
            result: Err(StockError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no price data".to_string(),
            }),
        }
    }

    #[test]
    fn test_plain_text_summary() {
        let text = PlainTextFormatter::default().format_report(&sample_report());
        assert_eq!(
            text,
            "=== Financial Analysis Summary for AAPL ===\n\
             Recommendation: Buy\n\
             Current Price: 150.00\n\
             Target Price: 175.50\n\
             Time Horizon: 3 months\n\
             Trend: Bullish\n"
        );
    }

    #[test]
    fn test_plain_text_detailed_sections() {
        let text = PlainTextFormatter { detailed: true }.format_report(&sample_report());
        assert!(text.contains("--- Sector: Technology (XLK) ---"));
        assert!(text.contains("Sector P/E: 30.00"));
        assert!(text.contains("(API error: HTTP 500)"));
        assert!(text.contains("P/B: N/A"));
        assert!(text.contains("RSI: 62.50"));
        assert!(text.contains("Score: 3/3"));
    }

    #[test]
    fn test_batch_renders_failures_in_order() {
        let outcomes = vec![
            failed("BAD"),
            TickerOutcome {
                symbol: "AAPL".to_string(),
                result: Ok(sample_report()),
            },
        ];
        let text = PlainTextFormatter::default().format_batch(&outcomes);
        let bad = text.find("Summary for BAD").unwrap();
        let good = text.find("Summary for AAPL").unwrap();
        assert!(bad < good);
        assert!(text.contains("Error: Data not available for BAD: no price data"));
    }

    #[test]
    fn test_table_contains_rows() {
        let outcomes = vec![
            TickerOutcome {
                symbol: "AAPL".to_string(),
                result: Ok(sample_report()),
            },
            failed("BAD"),
        ];
        let table = TableFormatter.format_batch(&outcomes);
        assert!(table.contains("Ticker"));
        assert!(table.contains("AAPL"));
        assert!(table.contains("175.50"));
        assert!(table.contains("17.00%"));
        assert!(table.contains("BAD"));
        assert!(table.contains("Error"));
    }

    #[test]
    fn test_json_batch() {
        let outcomes = vec![
            TickerOutcome {
                symbol: "AAPL".to_string(),
                result: Ok(sample_report()),
            },
            failed("BAD"),
        ];
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_batch(&outcomes)).unwrap();

        assert_eq!(value[0]["status"], "ok");
        assert_eq!(value[0]["report"]["recommendation"]["verdict"], "Buy");
        assert_eq!(value[0]["report"]["fundamentals"]["pb_ratio"], serde_json::Value::Null);
        assert_eq!(value[0]["report"]["sector"]["industry_trends"]["status"], "fallback");
        assert_eq!(value[1]["status"], "error");
        assert_eq!(value[1]["symbol"], "BAD");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
