//! # Engine Constants
//!
//! Fixed tuning values shared by the trajectory generator and the render
//! contract. Per-tier tuning lives in the intensity profile table instead.

use crate::math::Vec2;

// =============================================================================
// ORIGIN
// =============================================================================

/// Origin used when a trigger supplies no usable hint (viewport percent).
pub const DEFAULT_ORIGIN: Vec2 = Vec2::new(50.0, 40.0);

/// Lower bound for any resolved origin coordinate.
pub const VIEWPORT_MIN: f32 = 0.0;

/// Upper bound for any resolved origin coordinate.
pub const VIEWPORT_MAX: f32 = 100.0;

// =============================================================================
// POPULATION
// =============================================================================

/// Sparkles emitted with the initial wave, regardless of tier.
pub const DEFAULT_SPARKLE_COUNT: u32 = 12;

/// Probability that a confetti piece is rendered on the far layer.
pub const FAR_DEPTH_PROBABILITY: f32 = 0.4;

/// Per-particle speed jitter range (multiplier).
pub const SPEED_JITTER: (f32, f32) = (0.8, 1.2);

/// Maximum start offset from the origin on each axis (viewport percent).
pub const SPAWN_JITTER: f32 = 1.5;

/// Spin speed magnitude range (degrees per second); sign is random.
pub const SPIN_SPEED_RANGE: (f32, f32) = (180.0, 720.0);

// =============================================================================
// TRAILING BURSTS
// =============================================================================

/// Cone multiplier applied to trailing bursts.
pub const TRAILING_SPREAD_FACTOR: f32 = 0.7;

/// Minimum-velocity multiplier applied to trailing bursts.
pub const TRAILING_VELOCITY_BOOST: f32 = 1.25;

// =============================================================================
// SPARKLES
// =============================================================================

/// Sparkle speed range (viewport percent).
pub const SPARKLE_SPEED_RANGE: (f32, f32) = (6.0, 16.0);

/// Sparkle lifespan range (milliseconds).
pub const SPARKLE_LIFESPAN_MS: (u32, u32) = (300, 600);

/// Sparkle size range (viewport percent).
pub const SPARKLE_SIZE_RANGE: (f32, f32) = (0.4, 1.0);

// =============================================================================
// RENDER CONTRACT
// =============================================================================

/// Share of the upward launch velocity kept in the end displacement.
pub const RISE_FACTOR: f32 = 0.3;

/// Multiplier turning a profile's gravity into a downward end displacement.
pub const FALL_FACTOR: f32 = 0.8;

/// Multiplier turning spin speed into the end rotation delta.
pub const SPIN_FACTOR: f32 = 1.2;

/// Scale applied to far-layer particles.
pub const FAR_SCALE: f32 = 0.7;

/// Opacity applied to far-layer particles.
pub const FAR_OPACITY: f32 = 0.6;

/// Blur radius applied to far-layer particles (pixels).
pub const FAR_BLUR_PX: f32 = 1.5;
