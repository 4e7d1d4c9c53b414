//! Error kinds surfaced by ingestion and queries.
//!
//! Per-record normalization failures never appear here: they are absorbed
//! by the normalizer and reported as a dropped count.

use thiserror::Error;

/// Result type alias using [`DrawError`].
pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// The upstream payload has no `rounds` array. Fatal to an ingestion run.
    #[error("invalid upstream format: {0}")]
    InvalidUpstreamFormat(String),

    /// A client-supplied query parameter could not be interpreted.
    #[error("invalid query input: {0}")]
    InvalidQueryInput(String),

    /// No record matched a single-record lookup.
    #[error("not found: {0}")]
    NotFound(String),

    /// The (filtered) collection is empty and an aggregate was requested.
    #[error("no data: {0}")]
    NoData(String),

    /// No snapshot has ever been persisted.
    #[error("no snapshot available; run `eedraws sync` first")]
    MissingSnapshot,
}

impl DrawError {
    pub fn invalid_upstream(msg: impl Into<String>) -> Self {
        DrawError::InvalidUpstreamFormat(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        DrawError::InvalidQueryInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DrawError::NotFound(msg.into())
    }

    pub fn no_data(msg: impl Into<String>) -> Self {
        DrawError::NoData(msg.into())
    }

    /// Machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            DrawError::InvalidUpstreamFormat(_) => "invalid_upstream",
            DrawError::InvalidQueryInput(_) => "bad_request",
            DrawError::NotFound(_) => "not_found",
            DrawError::NoData(_) => "no_data",
            DrawError::MissingSnapshot => "no_snapshot",
        }
    }
}
