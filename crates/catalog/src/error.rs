//! Errors surfaced by the catalog layer.

use thiserror::Error;

/// Errors that can occur when fetching or querying the catalog.
///
/// Storage failures are deliberately absent: durable persistence degrades to
/// in-memory operation and is only ever logged (see [`crate::persist`]).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered but reported failure: non-success status or a
    /// payload with `success: false`. Carries the server-provided message
    /// when one exists.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// JSON parsing of the upstream payload failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Malformed query parameter, e.g. a zero pagination limit.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::Upstream("catalog unavailable".to_string());
        assert_eq!(err.to_string(), "upstream error: catalog unavailable");

        let err = CatalogError::InvalidArgument("per_page must be positive".to_string());
        assert_eq!(err.to_string(), "invalid argument: per_page must be positive");
    }
}
