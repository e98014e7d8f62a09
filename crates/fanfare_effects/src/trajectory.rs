//! # Trajectory Generator
//!
//! Turns a burst description into a population of immutable particles.
//! Everything random is drawn from the injected RNG, in a fixed order, so a
//! seeded engine produces the same celebration every time.

use fanfare_shared::constants::{
    FAR_DEPTH_PROBABILITY, SPARKLE_LIFESPAN_MS, SPARKLE_SIZE_RANGE, SPARKLE_SPEED_RANGE,
    SPAWN_JITTER, SPEED_JITTER, SPIN_SPEED_RANGE, TRAILING_SPREAD_FACTOR,
    TRAILING_VELOCITY_BOOST,
};
use fanfare_shared::Vec2;
use fanfare_ui::{Depth, CONFETTI_PALETTE};
use rand::Rng;

use crate::particle::{ConfettiPiece, IdAllocator, SparkleParticle, WaveId};
use crate::profile::{IntensityProfile, ShapeWeights, Span};

/// Straight up, in screen coordinates.
const UP_DEG: f32 = -90.0;

/// Per-burst generation parameters derived from a profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstParams {
    /// Cone width (degrees), centered on straight up.
    pub spread_angle_deg: f32,
    /// Launch speed range before jitter.
    pub velocity: Span<f32>,
    /// Source profile (sizes, weights, gravity, drag, lifespans).
    pub profile: IntensityProfile,
}

impl BurstParams {
    /// Parameters for the initial wave.
    #[must_use]
    pub const fn initial(profile: &IntensityProfile) -> Self {
        Self {
            spread_angle_deg: profile.spread_angle_deg,
            velocity: profile.velocity,
            profile: *profile,
        }
    }

    /// Parameters for a trailing burst: cone × 0.7, minimum speed × 1.25
    /// (capped at the maximum).
    #[must_use]
    pub fn trailing(profile: &IntensityProfile) -> Self {
        let max = profile.velocity.max;
        let min = (profile.velocity.min * TRAILING_VELOCITY_BOOST).min(max);
        Self {
            spread_angle_deg: profile.spread_angle_deg * TRAILING_SPREAD_FACTOR,
            velocity: Span::new(min, max),
            profile: *profile,
        }
    }

    /// Inclusive launch angle bounds (degrees).
    #[must_use]
    pub fn angle_bounds(&self) -> (f32, f32) {
        let half = self.spread_angle_deg * 0.5;
        (UP_DEG - half, UP_DEG + half)
    }

    fn shape_weights(&self) -> ShapeWeights {
        self.profile.shape_weights
    }
}

/// Uniform draw in `[min, max]`; a collapsed or inverted range yields `min`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

fn uniform_ms<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

/// Stateless particle factory.
pub struct TrajectoryGenerator;

impl TrajectoryGenerator {
    /// Generates `count` confetti pieces for one wave.
    pub fn confetti<R: Rng + ?Sized>(
        rng: &mut R,
        params: &BurstParams,
        origin: Vec2,
        count: u32,
        wave: WaveId,
        ids: &mut IdAllocator,
    ) -> Vec<ConfettiPiece> {
        let (angle_min, angle_max) = params.angle_bounds();
        let profile = &params.profile;
        let weights = params.shape_weights();

        (0..count)
            .map(|_| {
                let launch_angle_deg = uniform(rng, angle_min, angle_max);
                let speed = uniform(rng, params.velocity.min, params.velocity.max)
                    * uniform(rng, SPEED_JITTER.0, SPEED_JITTER.1);
                let velocity = Vec2::from_angle_deg(launch_angle_deg) * speed;

                let shape = weights.pick(rng.gen::<f32>());
                let size_range = profile.size_range(shape);
                let size = uniform(rng, size_range.min, size_range.max);
                let color = CONFETTI_PALETTE[rng.gen_range(0..CONFETTI_PALETTE.len())];
                let depth = if rng.gen::<f32>() < FAR_DEPTH_PROBABILITY {
                    Depth::Far
                } else {
                    Depth::Near
                };
                let lifespan_ms = uniform_ms(rng, profile.lifespan_ms.min, profile.lifespan_ms.max);

                let jitter = Vec2::new(
                    uniform(rng, -SPAWN_JITTER, SPAWN_JITTER),
                    uniform(rng, -SPAWN_JITTER, SPAWN_JITTER),
                );
                let rotation_deg = rng.gen_range(0.0..360.0);
                let spin = uniform(rng, SPIN_SPEED_RANGE.0, SPIN_SPEED_RANGE.1);
                let rotation_speed_deg_per_sec = if rng.gen::<bool>() { spin } else { -spin };

                ConfettiPiece {
                    id: ids.next_id(),
                    wave,
                    origin,
                    jitter,
                    velocity,
                    launch_angle_deg,
                    color,
                    rotation_deg,
                    rotation_speed_deg_per_sec,
                    size,
                    shape,
                    gravity: profile.gravity,
                    drag: profile.drag,
                    lifespan_ms,
                    depth,
                }
            })
            .collect()
    }

    /// Generates `count` omnidirectional sparkles.
    pub fn sparkles<R: Rng + ?Sized>(
        rng: &mut R,
        origin: Vec2,
        count: u32,
        wave: WaveId,
        ids: &mut IdAllocator,
    ) -> Vec<SparkleParticle> {
        (0..count)
            .map(|_| {
                let angle = rng.gen_range(0.0..360.0);
                let speed = uniform(rng, SPARKLE_SPEED_RANGE.0, SPARKLE_SPEED_RANGE.1);
                SparkleParticle {
                    id: ids.next_id(),
                    wave,
                    origin,
                    velocity: Vec2::from_angle_deg(angle) * speed,
                    size: uniform(rng, SPARKLE_SIZE_RANGE.0, SPARKLE_SIZE_RANGE.1),
                    lifespan_ms: uniform_ms(rng, SPARKLE_LIFESPAN_MS.0, SPARKLE_LIFESPAN_MS.1),
                }
            })
            .collect()
    }
}
