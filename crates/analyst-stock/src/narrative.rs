//! Recovered results of narrative provider calls

use serde::{Deserialize, Serialize};
use std::fmt;

/// Commentary text, either generated or substituted after a failure
///
/// The pipeline never stops on a narrative failure. It keeps the failure
/// reason next to the fallback text so reports can show both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NarrativeOutcome {
    /// Text returned by the provider
    Generated { text: String },
    /// Deterministic fallback text, with the provider's failure reason
    Fallback { text: String, reason: String },
}

impl NarrativeOutcome {
    pub fn generated(text: impl Into<String>) -> Self {
        Self::Generated { text: text.into() }
    }

    /// Build a fallback whose text embeds the failure reason
    pub fn fallback(default_text: &str, reason: impl fmt::Display) -> Self {
        let reason = reason.to_string();
        Self::Fallback {
            text: format!("{default_text} (API error: {reason})"),
            reason,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Generated { text } | Self::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Generated { .. } => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}

impl fmt::Display for NarrativeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
