//! Error types for chromacloud

use thiserror::Error;

/// Main error type for chromacloud operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Dimension mismatch: vector of size {left} combined with vector of size {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type alias for chromacloud operations
pub type Result<T> = std::result::Result<T, Error>;
