//! # Effect Error Types
//!
//! The engine itself never fails: bad runtime input degrades to defaults.
//! These errors only surface when loading or replacing tuning data.

use thiserror::Error;

use crate::profile::IntensityTier;

/// Errors found while validating an intensity profile.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Shape weights do not sum to one.
    #[error("shape weights for {tier} sum to {sum}, expected 1.0")]
    InvalidWeights {
        /// Offending tier.
        tier: IntensityTier,
        /// Actual sum.
        sum: f32,
    },

    /// A `{min, max}` range has `min > max` or a non-finite bound.
    #[error("range `{field}` of {tier} is inverted or not finite")]
    InvertedRange {
        /// Offending tier.
        tier: IntensityTier,
        /// Field name.
        field: &'static str,
    },

    /// A scalar is outside its allowed domain.
    #[error("`{field}` of {tier} is out of range: {value}")]
    OutOfRange {
        /// Offending tier.
        tier: IntensityTier,
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },

    /// The total duration ends before the last particle has decayed.
    #[error("total duration of {tier} is {actual_ms}ms, needs at least {required_ms}ms")]
    DurationTooShort {
        /// Offending tier.
        tier: IntensityTier,
        /// Minimum duration covering every wave.
        required_ms: u32,
        /// Configured duration.
        actual_ms: u32,
    },

    /// Tier name not recognised.
    #[error("unknown intensity tier: {0:?}")]
    UnknownTier(String),
}

/// Errors that can occur while loading engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A profile in the config breaks a profile invariant.
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),
}

/// Result type for profile validation.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
