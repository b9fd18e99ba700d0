//! Error types for deck-core.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the fallible parts of the model (media payloads).
/// Business-rule violations are never reported through this type.
#[derive(Error, Debug)]
pub enum Error {
    /// The string is not a `data:<mime>;base64,<payload>` URI.
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// The base64 payload of a data URI could not be decoded.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The image bytes could not be decoded or re-encoded.
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// The crop rectangle maps to an empty region of the source image.
    #[error("Crop rectangle is empty after clamping to the source image")]
    EmptyCrop,
}
