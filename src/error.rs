//! Crate-level error types.
//!
//! The rendering engine itself never fails: it degrades on malformed input.
//! [`DepthViewError`] covers the host-facing edges (configuration, replay
//! files, terminal setup) so the binary can use `?` throughout.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DepthViewError>;

/// Top-level error type returned by fallible public APIs.
#[derive(Debug, thiserror::Error)]
pub enum DepthViewError {
    /// A configuration value or file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(String),
}
