//! # Intensity Profiles
//!
//! Pure tuning data: one immutable [`IntensityProfile`] per
//! [`IntensityTier`]. The reference table is compiled in; hosts may replace
//! individual tiers through [`ProfileTable::set`] or the TOML config, and
//! every replacement is validated first.
//!
//! Units: velocities, gravity and sizes are viewport percent, times are
//! milliseconds, angles are degrees.

use std::fmt;
use std::str::FromStr;

use fanfare_shared::constants::SPARKLE_LIFESPAN_MS;
use fanfare_ui::ParticleShape;
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};

/// Tolerance when checking that shape weights sum to one.
pub const WEIGHT_EPSILON: f32 = 1e-3;

/// Named burst size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityTier {
    /// Small acknowledgement (alliance actions).
    Low,
    /// Default celebration.
    #[default]
    Medium,
    /// Big moment (level-up).
    High,
}

impl IntensityTier {
    /// All tiers, smallest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Lowercase name used in configs and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Lenient parse for caller-supplied names.
    ///
    /// Unknown names fall back to [`IntensityTier::Medium`]: a malformed
    /// celebration request must never break the host.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown intensity tier {:?}, falling back to medium", name);
            Self::Medium
        })
    }
}

impl FromStr for IntensityTier {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ProfileError::UnknownTier(s.to_string())),
        }
    }
}

impl fmt::Display for IntensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive `{min, max}` range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span<T> {
    /// Lower bound.
    pub min: T,
    /// Upper bound.
    pub max: T,
}

impl<T> Span<T> {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl Span<f32> {
    /// Returns true if both bounds are finite and `min <= max`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Returns true if `value` lies inside the range.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Span<u32> {
    /// Returns true if `min <= max`.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Returns true if `value` lies inside the range.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Probability of each confetti shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeWeights {
    /// Rectangle probability.
    pub rectangle: f32,
    /// Circle probability.
    pub circle: f32,
    /// Star probability.
    pub star: f32,
}

impl ShapeWeights {
    /// Creates a weight set.
    #[must_use]
    pub const fn new(rectangle: f32, circle: f32, star: f32) -> Self {
        Self {
            rectangle,
            circle,
            star,
        }
    }

    /// Weight of one shape.
    #[must_use]
    pub const fn weight(&self, shape: ParticleShape) -> f32 {
        match shape {
            ParticleShape::Rectangle => self.rectangle,
            ParticleShape::Circle => self.circle,
            ParticleShape::Star => self.star,
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.rectangle + self.circle + self.star
    }

    /// Cumulative pick for a uniform `roll` in `[0, 1)`.
    #[must_use]
    pub fn pick(&self, roll: f32) -> ParticleShape {
        let target = roll * self.total();
        let mut cumulative = 0.0;

        for shape in ParticleShape::ALL {
            cumulative += self.weight(shape);
            if target < cumulative {
                return shape;
            }
        }

        // Rounding at the top edge lands on the last shape with any weight
        ParticleShape::ALL
            .into_iter()
            .rev()
            .find(|shape| self.weight(*shape) > 0.0)
            .unwrap_or(ParticleShape::Rectangle)
    }
}

/// Complete tuning for one tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntensityProfile {
    /// Confetti pieces in the initial wave.
    pub particle_count: u32,
    /// Launch cone width around straight up (degrees).
    pub spread_angle_deg: f32,
    /// Launch speed range.
    pub velocity: Span<f32>,
    /// Rectangle size range.
    pub rectangle_size: Span<f32>,
    /// Circle size range.
    pub circle_size: Span<f32>,
    /// Star size range.
    pub star_size: Span<f32>,
    /// Shape distribution.
    pub shape_weights: ShapeWeights,
    /// Downward pull applied to the end keyframe.
    pub gravity: f32,
    /// Horizontal damping (0-1).
    pub drag: f32,
    /// Individual particle lifespan range (ms).
    pub lifespan_ms: Span<u32>,
    /// Trailing bursts after the initial wave.
    pub trailing_burst_count: u32,
    /// Gap between trailing bursts (ms).
    pub trailing_burst_interval_ms: u32,
    /// Confetti pieces per trailing burst.
    pub trailing_burst_size: u32,
    /// Session length, start to completion (ms).
    pub total_duration_ms: u32,
}

impl IntensityProfile {
    /// Reference `low` tier.
    pub const LOW: Self = Self {
        particle_count: 30,
        spread_angle_deg: 60.0,
        velocity: Span::new(14.0, 26.0),
        rectangle_size: Span::new(0.8, 1.4),
        circle_size: Span::new(0.6, 1.0),
        star_size: Span::new(1.0, 1.6),
        shape_weights: ShapeWeights::new(0.6, 0.3, 0.1),
        gravity: 18.0,
        drag: 0.2,
        lifespan_ms: Span::new(450, 700),
        trailing_burst_count: 1,
        trailing_burst_interval_ms: 120,
        trailing_burst_size: 8,
        total_duration_ms: 850,
    };

    /// Reference `medium` tier.
    pub const MEDIUM: Self = Self {
        particle_count: 60,
        spread_angle_deg: 80.0,
        velocity: Span::new(18.0, 32.0),
        rectangle_size: Span::new(0.9, 1.6),
        circle_size: Span::new(0.7, 1.2),
        star_size: Span::new(1.1, 1.8),
        shape_weights: ShapeWeights::new(0.5, 0.3, 0.2),
        gravity: 22.0,
        drag: 0.15,
        lifespan_ms: Span::new(550, 900),
        trailing_burst_count: 2,
        trailing_burst_interval_ms: 150,
        trailing_burst_size: 12,
        total_duration_ms: 1200,
    };

    /// Reference `high` tier.
    pub const HIGH: Self = Self {
        particle_count: 100,
        spread_angle_deg: 100.0,
        velocity: Span::new(22.0, 40.0),
        rectangle_size: Span::new(1.0, 1.8),
        circle_size: Span::new(0.8, 1.3),
        star_size: Span::new(1.2, 2.0),
        shape_weights: ShapeWeights::new(0.4, 0.3, 0.3),
        gravity: 26.0,
        drag: 0.1,
        lifespan_ms: Span::new(650, 1050),
        trailing_burst_count: 3,
        trailing_burst_interval_ms: 150,
        trailing_burst_size: 16,
        total_duration_ms: 1500,
    };

    /// Reference profile for `tier`.
    #[must_use]
    pub const fn reference(tier: IntensityTier) -> &'static Self {
        match tier {
            IntensityTier::Low => &Self::LOW,
            IntensityTier::Medium => &Self::MEDIUM,
            IntensityTier::High => &Self::HIGH,
        }
    }

    /// Size range for a shape.
    #[must_use]
    pub const fn size_range(&self, shape: ParticleShape) -> Span<f32> {
        match shape {
            ParticleShape::Rectangle => self.rectangle_size,
            ParticleShape::Circle => self.circle_size,
            ParticleShape::Star => self.star_size,
        }
    }

    /// Spawn offset of the last trailing burst (ms).
    #[must_use]
    pub const fn last_burst_offset_ms(&self) -> u32 {
        self.trailing_burst_interval_ms
            .saturating_mul(self.trailing_burst_count)
    }

    /// Shortest `total_duration_ms` that outlives every particle.
    ///
    /// The last trailing burst's longest-lived piece, or the initial wave's
    /// sparkles, whichever ends later.
    #[must_use]
    pub fn required_duration_ms(&self) -> u32 {
        let confetti = self
            .last_burst_offset_ms()
            .saturating_add(self.lifespan_ms.max);
        confetti.max(SPARKLE_LIFESPAN_MS.1)
    }

    /// Checks every profile invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self, tier: IntensityTier) -> ProfileResult<()> {
        let ranges = [
            ("velocity", self.velocity),
            ("rectangle_size", self.rectangle_size),
            ("circle_size", self.circle_size),
            ("star_size", self.star_size),
        ];
        for (field, range) in ranges {
            if !range.is_ordered() || range.min < 0.0 {
                return Err(ProfileError::InvertedRange { tier, field });
            }
        }
        if !self.lifespan_ms.is_ordered() || self.lifespan_ms.max == 0 {
            return Err(ProfileError::InvertedRange {
                tier,
                field: "lifespan_ms",
            });
        }

        if !(0.0..=360.0).contains(&self.spread_angle_deg) {
            return Err(ProfileError::OutOfRange {
                tier,
                field: "spread_angle_deg",
                value: self.spread_angle_deg,
            });
        }
        if !(0.0..=1.0).contains(&self.drag) {
            return Err(ProfileError::OutOfRange {
                tier,
                field: "drag",
                value: self.drag,
            });
        }
        if !self.gravity.is_finite() {
            return Err(ProfileError::OutOfRange {
                tier,
                field: "gravity",
                value: self.gravity,
            });
        }
        if self.trailing_burst_count > 0 && self.trailing_burst_interval_ms == 0 {
            return Err(ProfileError::OutOfRange {
                tier,
                field: "trailing_burst_interval_ms",
                value: 0.0,
            });
        }

        for shape in ParticleShape::ALL {
            let weight = self.shape_weights.weight(shape);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ProfileError::OutOfRange {
                    tier,
                    field: "shape_weights",
                    value: weight,
                });
            }
        }
        let sum = self.shape_weights.total();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(ProfileError::InvalidWeights { tier, sum });
        }

        let required_ms = self.required_duration_ms();
        if self.total_duration_ms < required_ms {
            return Err(ProfileError::DurationTooShort {
                tier,
                required_ms,
                actual_ms: self.total_duration_ms,
            });
        }

        Ok(())
    }
}

impl Default for IntensityProfile {
    fn default() -> Self {
        Self::MEDIUM
    }
}

/// The profile for every tier.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileTable {
    low: IntensityProfile,
    medium: IntensityProfile,
    high: IntensityProfile,
}

impl ProfileTable {
    /// The compiled-in reference table.
    #[must_use]
    pub const fn reference() -> Self {
        Self {
            low: IntensityProfile::LOW,
            medium: IntensityProfile::MEDIUM,
            high: IntensityProfile::HIGH,
        }
    }

    /// Profile for `tier`.
    #[must_use]
    pub const fn get(&self, tier: IntensityTier) -> &IntensityProfile {
        match tier {
            IntensityTier::Low => &self.low,
            IntensityTier::Medium => &self.medium,
            IntensityTier::High => &self.high,
        }
    }

    /// Replaces the profile for `tier` after validating it.
    ///
    /// # Errors
    ///
    /// Returns the violated invariant; the table is left unchanged.
    pub fn set(&mut self, tier: IntensityTier, profile: IntensityProfile) -> ProfileResult<()> {
        profile.validate(tier)?;
        match tier {
            IntensityTier::Low => self.low = profile,
            IntensityTier::Medium => self.medium = profile,
            IntensityTier::High => self.high = profile,
        }
        Ok(())
    }

    /// Validates every tier.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> ProfileResult<()> {
        IntensityTier::ALL
            .into_iter()
            .try_for_each(|tier| self.get(tier).validate(tier))
    }

    /// Iterates `(tier, profile)` pairs, smallest tier first.
    pub fn iter(&self) -> impl Iterator<Item = (IntensityTier, &IntensityProfile)> {
        IntensityTier::ALL
            .into_iter()
            .map(move |tier| (tier, self.get(tier)))
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::reference()
    }
}
