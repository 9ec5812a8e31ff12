//! Narrative text providers for stock-analyst
//!
//! The analysis pipeline asks an external text service for short commentary
//! (economic outlook, industry trends, company evaluation). This crate holds
//! the provider seam and its HTTP implementations:
//!
//! - [`NarrativeProvider`]: prompt in, free text out, or a typed failure
//! - [`providers::QueryEndpointProvider`]: `{"query", "api_key"}` JSON endpoints
//! - [`providers::OpenAiCompatibleProvider`]: `/chat/completions` style APIs
//! - [`providers::UnconfiguredProvider`]: always fails, used when no endpoint is set
//!
//! Callers are expected to recover from every error this crate returns.

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::{ApiStyle, NarrativeConfig};
pub use error::{NarrativeError, Result};
pub use provider::NarrativeProvider;
pub use providers::build_provider;
