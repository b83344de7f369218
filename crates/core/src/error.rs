//! Error types for rastermap

use thiserror::Error;

/// Main error type for rastermap operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: isize, height: isize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{rasterizer} cannot rasterize {kind} geometries")]
    UnsupportedGeometry {
        rasterizer: &'static str,
        kind: &'static str,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for rastermap operations
pub type Result<T> = std::result::Result<T, Error>;
