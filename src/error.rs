use thiserror::Error;

/// Errors that can occur while moving pixels in or out of the app
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("File I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font unavailable: {0}")]
    Font(String),
}

/// Result type for fallible sketch operations
pub type SketchResult<T> = Result<T, SketchError>;
