//! Error types for surface operations

use crate::types::{ObjectId, SurfaceHandle};
use thiserror::Error;

/// Errors raised by the drawing surface.
///
/// `InvalidHandle` and `InvalidDimensions` indicate misuse by the caller
/// rather than bad user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The handle was never issued or its surface has been disposed
    #[error("invalid surface handle: {0}")]
    InvalidHandle(SurfaceHandle),

    /// Width or height is zero, or the raster would exceed the page limits
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// No drawable with this id lives on the surface
    #[error("no object {0} on surface")]
    UnknownObject(ObjectId),

    /// Rasterizing or encoding the surface failed
    #[error("failed to encode surface: {0}")]
    Encode(String),
}

/// Result type alias for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;
