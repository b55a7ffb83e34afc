//! Error type shared by every operator and the pipeline.

use thiserror::Error;

/// Errors returned by the transform engine.
///
/// Every failure is reported as a value; no operator panics on bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The buffer itself is malformed (zero size, wrong byte count, wrong channel count).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A filter parameter is outside its documented range or would produce
    /// non-finite pixel values.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A grayscale method name that is not one of `luminance`, `average`, `lightness`.
    ///
    /// Only strict parsing reports this; the pipeline falls back to luminance.
    #[error("Unsupported method: '{0}'")]
    UnsupportedMethod(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
