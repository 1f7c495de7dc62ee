//! Error types for docslice library.

use crate::model::{ConversionStatus, Rect};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docslice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while exporting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raster decoding, encoding or saving failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A crop rectangle has no area or lies outside the raster.
    #[error("Degenerate crop region on page {page}: {rect}")]
    DegenerateRegion {
        /// Page the region belongs to
        page: u32,
        /// The offending rectangle
        rect: Rect,
    },

    /// A rendering capability is unavailable for this item.
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    /// An item could not be mapped because its content is inconsistent.
    #[error("Malformed item: {0}")]
    MalformedItem(String),

    /// The upstream conversion did not succeed; nothing is exported.
    #[error("Conversion of {} did not succeed (status: {status})", input.display())]
    ConversionFailed {
        /// Input file of the failed conversion
        input: PathBuf,
        /// Reported conversion status
        status: ConversionStatus,
    },

    /// The conversion result or document is unusable as a whole.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error only affects a single figure, table or item.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::DegenerateRegion { .. } | Error::MissingCapability(_) | Error::MalformedItem(_)
        )
    }
}
