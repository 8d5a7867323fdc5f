use thiserror::Error;

/// Configuration rejected at setup time.
///
/// These are fatal: a model built from an invalid configuration would miss
/// collisions or confine particles incorrectly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid region length: {0}")]
    InvalidRegionLength(f64),

    #[error("invalid region overlap: {0}")]
    InvalidRegionOverlap(f64),

    #[error("region overlap {overlap} is incompatible with region length {length}")]
    OverlapTooLarge { length: f64, overlap: f64 },

    #[error("invalid width range [{min}, {max}] with default {default}")]
    InvalidWidthRange { min: f64, max: f64, default: f64 },

    #[error("invalid container dimension {name}: {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("invalid lid range: min lid width {min}, max lid width {max}")]
    InvalidLidRange { min: f64, max: f64 },

    #[error("invalid mass: {0}")]
    InvalidMass(f64),

    #[error("invalid radius: {0}")]
    InvalidRadius(f64),
}
