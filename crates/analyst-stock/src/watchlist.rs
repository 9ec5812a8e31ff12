//! Ticker watch-lists
//!
//! A list file is either a bracketed literal such as `['AAPL', "MSFT"]` or
//! plain symbols separated by whitespace, commas or newlines. Lines starting
//! with `#` are comments. Order and duplicates are preserved.

use std::path::Path;
use tracing::debug;

use crate::error::{Result, StockError};

/// Parse the contents of a watch-list
pub fn parse_watchlist(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(|line| {
            line.split(|c: char| c == ',' || c.is_whitespace())
                .map(|token| {
                    token
                        .trim_matches(|c: char| matches!(c, '[' | ']' | '\'' | '"'))
                        .trim()
                })
                .filter(|token| !token.is_empty())
                .map(str::to_uppercase)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Read and parse one watch-list file
pub fn load_watchlist(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| StockError::WatchlistError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let tickers = parse_watchlist(&contents);
    debug!(path = %path.display(), count = tickers.len(), "Loaded watch-list");

    if tickers.is_empty() {
        return Err(StockError::WatchlistError {
            path: path.display().to_string(),
            reason: "no symbols found".to_string(),
        });
    }

    Ok(tickers)
}

/// Load several lists and concatenate them in order
pub fn load_watchlists<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>> {
    let mut tickers = Vec::new();
    for path in paths {
        tickers.extend(load_watchlist(path)?);
    }
    Ok(tickers)
}
