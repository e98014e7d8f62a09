//! # Engine Configuration
//!
//! Optional TOML tuning, loaded once at startup. Every field has a default,
//! so an empty file yields the reference engine.
//!
//! ```toml
//! seed = 7
//! sparkle_count = 16
//! default_origin = { x = 50.0, y = 35.0 }
//!
//! [profiles.low]
//! particle_count = 24
//! # ...every IntensityProfile field
//! ```

use std::fs;
use std::path::Path;

use fanfare_shared::constants::{DEFAULT_ORIGIN, DEFAULT_SPARKLE_COUNT};
use fanfare_shared::Vec2;
use fanfare_ui::{KeyframeSampler, Viewport};
use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::profile::{IntensityProfile, IntensityTier, ProfileTable};

/// Per-tier replacements for the reference profiles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverrides {
    /// Replacement `low` profile.
    pub low: Option<IntensityProfile>,
    /// Replacement `medium` profile.
    pub medium: Option<IntensityProfile>,
    /// Replacement `high` profile.
    pub high: Option<IntensityProfile>,
}

impl ProfileOverrides {
    /// Override for `tier`, if configured.
    #[must_use]
    pub const fn get(&self, tier: IntensityTier) -> Option<&IntensityProfile> {
        match tier {
            IntensityTier::Low => self.low.as_ref(),
            IntensityTier::Medium => self.medium.as_ref(),
            IntensityTier::High => self.high.as_ref(),
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// RNG seed. `None` seeds from the system time.
    pub seed: Option<u64>,
    /// Sparkles in every initial wave.
    pub sparkle_count: u32,
    /// Origin used when a trigger gives no usable hint (viewport percent).
    pub default_origin: Vec2,
    /// Tick rate for hosts using the keyframe sampler.
    pub sample_rate_hz: u32,
    /// Initial viewport (pixels).
    pub viewport: Viewport,
    /// Tier overrides.
    pub profiles: ProfileOverrides,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sparkle_count: DEFAULT_SPARKLE_COUNT,
            default_origin: DEFAULT_ORIGIN,
            sample_rate_hz: KeyframeSampler::DEFAULT_RATE_HZ,
            viewport: Viewport::default(),
            profiles: ProfileOverrides::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not match the schema or a
    /// profile override breaks a profile invariant.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.profile_table()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    /// Reference table with every configured override applied.
    ///
    /// # Errors
    ///
    /// Returns the first invalid override.
    pub fn profile_table(&self) -> ConfigResult<ProfileTable> {
        let mut table = ProfileTable::reference();
        for tier in IntensityTier::ALL {
            if let Some(profile) = self.profiles.get(tier) {
                table.set(tier, *profile)?;
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ProfileError};

    const LOW_OVERRIDE: &str = r#"
        seed = 7
        sparkle_count = 20

        [profiles.low]
        particle_count = 24
        spread_angle_deg = 50.0
        velocity = { min = 12.0, max = 24.0 }
        rectangle_size = { min = 0.8, max = 1.4 }
        circle_size = { min = 0.6, max = 1.0 }
        star_size = { min = 1.0, max = 1.6 }
        shape_weights = { rectangle = 0.7, circle = 0.2, star = 0.1 }
        gravity = 16.0
        drag = 0.2
        lifespan_ms = { min = 400, max = 650 }
        trailing_burst_count = 1
        trailing_burst_interval_ms = 120
        trailing_burst_size = 6
        total_duration_ms = 800
    "#;

    #[test]
    fn test_empty_config_is_reference() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.profile_table().unwrap(), ProfileTable::reference());
    }

    #[test]
    fn test_override_one_tier_keeps_others() {
        let config = EngineConfig::from_toml_str(LOW_OVERRIDE).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.sparkle_count, 20);

        let table = config.profile_table().unwrap();
        assert_eq!(table.get(IntensityTier::Low).particle_count, 24);
        assert_eq!(table.get(IntensityTier::Medium), &IntensityProfile::MEDIUM);
        assert_eq!(table.get(IntensityTier::High), &IntensityProfile::HIGH);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let broken = LOW_OVERRIDE.replace("total_duration_ms = 800", "total_duration_ms = 500");
        let err = EngineConfig::from_toml_str(&broken).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidProfile(ProfileError::DurationTooShort { .. })
        ));
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let err = EngineConfig::from_toml_str("sparkles = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::from_path("/nonexistent/fanfare.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
