//! Error types for report generation

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ReportError>;

/// Everything that can go wrong while turning artifacts into a report.
///
/// Per-artifact variants are caught by the assembler and recorded as skips;
/// only [`ReportError::Io`] raised while preparing output directories or
/// writing the document ends a run.
#[derive(Error, Debug)]
pub enum ReportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Table could not be parsed
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    /// Audio container could not be probed or decoded
    #[error("audio decode failed: {0}")]
    Audio(#[from] symphonia::core::errors::Error),

    /// Audio decoded but is not mono 16-bit PCM
    #[error("unsupported audio: {0}")]
    UnsupportedAudio(String),

    /// Plotting backend failure
    #[error("rendering failed: {0}")]
    Image(String),

    /// A column required by a renderer is absent
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Nothing drawable (no rows, no dependent columns, too few samples)
    #[error("nothing to plot: {0}")]
    Empty(String),

    /// Manifest serialization failed
    #[error("manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
