//! Environment-backed settings helpers

use std::str::FromStr;

/// Read an environment variable, treating blank values as unset
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read and parse an environment variable
///
/// Returns `None` when the variable is unset, blank, or fails to parse.
pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env_var(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable environment value");
            None
        }
    }
}
