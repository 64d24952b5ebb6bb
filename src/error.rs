use thiserror::Error;

/// Errors raised when a detection request is structurally invalid.
///
/// Frames that are valid but contain no usable geometry are not errors; they
/// come back as a zero-confidence [`crate::DetectionResult`].
#[derive(Error, Debug)]
pub enum DetectError {
    /// Width or height is zero
    #[error("invalid edge map dimensions {width}x{height}")]
    InvalidDimensions {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
    },

    /// Buffer length does not match width * height * channels
    #[error("edge buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch {
        /// Length implied by the declared dimensions and pixel layout
        expected: usize,
        /// Length of the buffer actually supplied
        actual: usize,
    },

    /// Detection options are out of range
    #[error("invalid detection options: {0}")]
    InvalidOptions(String),

    /// Failed to load or decode an edge-map image (tools and CLI only)
    #[error("failed to load edge map image: {0}")]
    Image(#[from] image::ImageError),
}

/// Result alias used across the crate
pub type DetectResult<T> = Result<T, DetectError>;
