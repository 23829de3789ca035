//! Error types for cube generation

use thiserror::Error;

use crate::cube::CubePos;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("failed to allocate {bytes} bytes for a cube primer")]
    BufferAllocation { bytes: usize },

    #[error("generator '{generator}' failed at cube {pos}: {reason}")]
    Carver {
        generator: String,
        pos: CubePos,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
