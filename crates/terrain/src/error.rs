use thiserror::Error;

/// Configuration problems detected when building a terrain model.
///
/// Out-of-range values are reported, never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("Invalid bounds: extents must be finite and positive (width {width}, height {height})")]
    InvalidBounds { width: f64, height: f64 },

    #[error("Invalid sample count: {0}")]
    InvalidSampleCount(usize),

    #[error("Invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}
