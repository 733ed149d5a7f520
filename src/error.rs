//! Error type for the fallible outer surface: configuration and exports.
//!
//! Sculpting itself never fails; it skips steps and logs instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SculptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SculptError>;
