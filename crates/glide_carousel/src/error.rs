//! Error types for glide_carousel
//!
//! Only configuration can fail. Runtime edge cases (out-of-range targets,
//! navigation before layout, empty data, missing callbacks) are absorbed
//! by the widget and never surface as errors.

use thiserror::Error;

/// Errors that can occur while building a carousel configuration
#[derive(Error, Debug)]
pub enum CarouselError {
    /// Failed to read a config file
    #[error("Failed to read carousel config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML or has unknown fields
    #[error("Failed to parse carousel config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Fixed item width must be positive and finite
    #[error("Invalid item width: {0}")]
    InvalidItemWidth(f32),

    /// End-reached threshold must be non-negative and finite
    #[error("Invalid end-reached threshold: {0}")]
    InvalidThreshold(f32),

    /// Dot sizes must be positive, opacities within 0..=1
    #[error("Invalid dot style: {0}")]
    InvalidDotStyle(String),
}

/// Result type for glide_carousel operations
pub type Result<T> = std::result::Result<T, CarouselError>;
