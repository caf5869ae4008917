//! Error types for twzip.

use thiserror::Error;

/// Error type for twzip operations.
///
/// Lookups never error: unknown cities, areas, roads, and codes come back
/// as `None` or an empty collection. Errors only arise while reading or
/// validating a dataset snapshot.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A city/area pair has road rules but no 3-digit code
    #[error("no 3-digit code for {city}/{area}")]
    MissingZip3 { city: String, area: String },

    /// A 3-digit code is not exactly three ASCII digits
    #[error("invalid 3-digit code {code:?} for {city}/{area}")]
    InvalidZip3 {
        city: String,
        area: String,
        code: String,
    },
}

/// Result type alias for twzip operations.
pub type Result<T> = std::result::Result<T, Error>;
