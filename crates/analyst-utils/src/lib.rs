//! Shared utilities for stock-analyst
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup for the binary and small helpers for reading settings
//! from the process environment.

pub mod config;
pub mod logging;

pub use config::{env_parse, env_var};
pub use logging::{LogFormat, init_tracing};
