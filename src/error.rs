//! Error types shared across the crate.

use thiserror::Error;

/// Errors raised by the conversion engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A format descriptor registration omitted a required part.
    #[error("incomplete format descriptor for locale '{locale}': {reason}")]
    Configuration { locale: String, reason: String },

    /// The requested locale has no registered input format, or no host
    /// conventions the crate knows how to bind to.
    #[error("locale '{0}' is not supported; register a format for it first")]
    UnsupportedLocale(String),

    /// A localized date string did not match the registered pattern for the
    /// current locale.
    #[error("value '{value}' does not match the {kind} format for locale '{locale}'")]
    Format {
        value: String,
        kind: &'static str,
        locale: String,
    },
}

/// Result type for locale operations.
pub type Result<T> = std::result::Result<T, Error>;
