//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating [`super::CoreConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric environment variable failed to parse.
    #[error("failed to parse '{name}' = '{value}': {source}")]
    ParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// A similarity threshold or clamp-bounded setting fell outside its
    /// documented range after parsing.
    #[error("'{name}' must be in [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
}
