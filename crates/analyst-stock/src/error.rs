//! Error types for stock analysis operations

use thiserror::Error;

/// Stock analysis specific errors
///
/// Most failures inside a ticker analysis are recovered where they happen
/// (absent metrics, fallback narratives). The variants here are the ones that
/// reach a caller: configuration problems, and the loss of a ticker's own
/// price history, which leaves nothing to recommend on.
#[derive(Debug, Error)]
pub enum StockError {
    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Price history too short to produce even a latest price
    #[error("Insufficient history for {symbol}: {available} observations")]
    InsufficientHistory { symbol: String, available: usize },

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Narrative provider error
    #[error("Narrative error: {0}")]
    NarrativeError(#[from] analyst_llm::NarrativeError),

    /// Prompt template error
    #[error("Prompt error: {0}")]
    PromptError(#[from] minijinja::Error),

    /// Watch-list could not be read or parsed
    #[error("Watch-list error in {path}: {reason}")]
    WatchlistError { path: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
