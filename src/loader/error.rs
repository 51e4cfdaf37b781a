//! Error types for content loading
//!
//! Every decoder failure is mapped onto this enum before it leaves the
//! loader, so callers only ever see one error type per source file.

use thiserror::Error;

/// Errors that can occur while decoding a source file
#[derive(Error, Debug)]
pub enum LoadError {
    /// The declared type is not one the loader decodes
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The file content is malformed for its declared type
    #[error("Failed to decode file: {0}")]
    DecodeFailure(String),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF engine could not be loaded or failed internally
    #[error("PDF engine error: {0}")]
    Pdfium(String),

    /// File is too large to decode eagerly
    #[error("File too large: {size_mb}MB (max {max_mb}MB)")]
    TooLarge { size_mb: usize, max_mb: usize },

    /// The laid-out content needs a page larger than the rasterizer allows
    #[error("Content needs a {width}x{height} page, which is too large to draw")]
    PageTooLarge { width: u64, height: u64 },

    /// A page outside the document was requested
    #[error("Page {page} does not exist (document has {total})")]
    MissingPage { page: u16, total: u16 },
}

/// Result type alias for loading operations
pub type LoadResult<T> = Result<T, LoadError>;

impl LoadError {
    /// Wrap any displayable decoder error as a `DecodeFailure`.
    pub fn decode(err: impl std::fmt::Display) -> Self {
        LoadError::DecodeFailure(err.to_string())
    }
}

impl From<image::ImageError> for LoadError {
    fn from(err: image::ImageError) -> Self {
        LoadError::decode(err)
    }
}

impl From<zip::result::ZipError> for LoadError {
    fn from(err: zip::result::ZipError) -> Self {
        LoadError::decode(err)
    }
}

impl From<quick_xml::Error> for LoadError {
    fn from(err: quick_xml::Error) -> Self {
        LoadError::decode(err)
    }
}

impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        LoadError::decode(err)
    }
}
