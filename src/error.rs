use thiserror::Error;

/// Errors reported by raster-affecting canvas operations.
///
/// Interaction and history calls never fail; degenerate shapes are dropped
/// silently and pointer positions are clamped instead of rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("no raster is loaded")]
    NoRaster,
    #[error("raster buffer has {actual} bytes, expected {expected}")]
    InvalidRaster { expected: usize, actual: usize },
    #[error("rotation by {0} degrees is not a multiple of 90")]
    UnsupportedRotation(i32),
    #[error("no crop region is active")]
    NoCropRegion,
    #[error("crop region does not overlap the raster")]
    EmptyCrop,
    #[error("cannot allocate a {width}x{height} raster")]
    ResourceExhausted { width: u32, height: u32 },
}

pub type EditorResult<T = ()> = Result<T, EditorError>;
