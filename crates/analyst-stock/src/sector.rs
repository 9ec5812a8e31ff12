//! Market sector taxonomy and sector proxy ETFs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Market sector definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Healthcare,
    Financials,
    ConsumerDiscretionary,
    ConsumerStaples,
    Energy,
    Materials,
    Industrials,
    Utilities,
    RealEstate,
    CommunicationServices,
}

impl Sector {
    /// Get sector ETF ticker (SPDR Select Sector ETFs)
    pub fn etf_ticker(&self) -> &'static str {
        match self {
            Sector::Technology => "XLK",
            Sector::Healthcare => "XLV",
            Sector::Financials => "XLF",
            Sector::ConsumerDiscretionary => "XLY",
            Sector::ConsumerStaples => "XLP",
            Sector::Energy => "XLE",
            Sector::Materials => "XLB",
            Sector::Industrials => "XLI",
            Sector::Utilities => "XLU",
            Sector::RealEstate => "XLRE",
            Sector::CommunicationServices => "XLC",
        }
    }

    /// Get sector name
    pub fn name(&self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Healthcare => "Healthcare",
            Sector::Financials => "Financials",
            Sector::ConsumerDiscretionary => "Consumer Discretionary",
            Sector::ConsumerStaples => "Consumer Staples",
            Sector::Energy => "Energy",
            Sector::Materials => "Materials",
            Sector::Industrials => "Industrials",
            Sector::Utilities => "Utilities",
            Sector::RealEstate => "Real Estate",
            Sector::CommunicationServices => "Communication Services",
        }
    }

    /// Parse a provider's sector label
    ///
    /// Accepts GICS names, Yahoo's labels ("Financial Services",
    /// "Consumer Cyclical") and Alpha Vantage's office names ("LIFE SCIENCES").
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "technology" | "information technology" | "tech" => Some(Sector::Technology),
            "healthcare" | "health care" | "life sciences" => Some(Sector::Healthcare),
            "financials" | "financial services" | "finance" => Some(Sector::Financials),
            "consumer discretionary" | "consumer cyclical" | "trade & services" => {
                Some(Sector::ConsumerDiscretionary)
            }
            "consumer staples" | "consumer defensive" => Some(Sector::ConsumerStaples),
            "energy" | "energy & transportation" => Some(Sector::Energy),
            "materials" | "basic materials" => Some(Sector::Materials),
            "industrials" | "manufacturing" => Some(Sector::Industrials),
            "utilities" => Some(Sector::Utilities),
            "real estate" | "real estate & construction" => Some(Sector::RealEstate),
            "communication services" | "telecommunication services" => {
                Some(Sector::CommunicationServices)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ETF standing in for a company's sector; `fallback` when unknown
pub fn sector_proxy<'a>(label: Option<&str>, fallback: &'a str) -> &'a str {
    label
        .and_then(Sector::parse)
        .map_or(fallback, |sector| sector.etf_ticker())
}
