use terrain::TerrainError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Node index {index} out of range (network has {count} nodes)")]
    InvalidIndex { index: usize, count: usize },

    #[error("Terrain error: {0}")]
    Terrain(#[from] TerrainError),
}
