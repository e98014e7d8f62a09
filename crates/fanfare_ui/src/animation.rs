//! Keyframe curves for celebration particles.
//!
//! Every particle is described by exactly two motion keyframes (spawn and
//! rest) plus a fixed fade curve. Hosts interpolate between them; nothing
//! here steps a simulation.

use fanfare_shared::Vec2;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Exponential ease-out (fast launch, long settle). Used for flight paths.
    #[default]
    ExponentialOut,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::ExponentialOut => {
                // 1 - 2^(-10t)
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
        }
    }
}

/// Visual state of a particle at one keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeState {
    /// Position in viewport percent.
    pub position: Vec2,
    /// Rotation in degrees.
    pub rotation_deg: f32,
    /// Opacity (0-1).
    pub opacity: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl KeyframeState {
    /// Fully visible state at `position`.
    #[must_use]
    pub const fn visible(position: Vec2, rotation_deg: f32) -> Self {
        Self {
            position,
            rotation_deg,
            opacity: 1.0,
            scale: 1.0,
        }
    }
}

/// One stop of a fade curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeStop {
    /// Position in the particle's lifespan (0-1).
    pub offset: f32,
    /// Opacity at this stop.
    pub opacity: f32,
    /// Scale at this stop.
    pub scale: f32,
}

impl FadeStop {
    const fn new(offset: f32, opacity: f32, scale: f32) -> Self {
        Self {
            offset,
            opacity,
            scale,
        }
    }
}

/// Piecewise-linear opacity/scale curve over a particle's lifespan.
///
/// Stops are sorted by offset, the first sits at 0 and the last at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeCurve {
    stops: &'static [FadeStop],
}

impl FadeCurve {
    /// Confetti: hold fully visible, then fall to nothing.
    pub const CONFETTI: Self = Self {
        stops: &[
            FadeStop::new(0.0, 1.0, 1.0),
            FadeStop::new(0.6, 1.0, 1.0),
            FadeStop::new(0.8, 0.85, 0.9),
            FadeStop::new(1.0, 0.0, 0.0),
        ],
    };

    /// Sparkles: pop slightly larger, then shrink away.
    pub const SPARKLE: Self = Self {
        stops: &[
            FadeStop::new(0.0, 1.0, 1.0),
            FadeStop::new(0.3, 1.0, 1.3),
            FadeStop::new(1.0, 0.0, 0.0),
        ],
    };

    /// Returns the curve's stops.
    #[must_use]
    pub const fn stops(&self) -> &'static [FadeStop] {
        self.stops
    }

    /// Samples `(opacity, scale)` at `progress` (clamped to 0-1).
    #[must_use]
    pub fn sample(&self, progress: f32) -> (f32, f32) {
        let p = progress.clamp(0.0, 1.0);

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if p <= b.offset {
                let span = b.offset - a.offset;
                let t = if span > 0.0 { (p - a.offset) / span } else { 1.0 };
                return (
                    a.opacity + (b.opacity - a.opacity) * t,
                    a.scale + (b.scale - a.scale) * t,
                );
            }
        }

        self.stops
            .last()
            .map_or((0.0, 0.0), |last| (last.opacity, last.scale))
    }
}

/// Declarative animation for one particle.
///
/// Timing is relative to the session start: the particle appears after
/// `delay_ms` (its wave's spawn offset) and is gone `duration_ms` later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleAnimation {
    /// Wave spawn offset from session start (ms).
    pub delay_ms: u32,
    /// Particle lifespan (ms).
    pub duration_ms: u32,
    /// Spawn keyframe.
    pub start: KeyframeState,
    /// Rest keyframe.
    pub end: KeyframeState,
    /// Opacity/scale curve over the lifespan.
    pub fade: FadeCurve,
    /// Easing applied to position and rotation.
    pub easing: Easing,
}

impl ParticleAnimation {
    /// Session time (ms) after which the particle is fully gone.
    #[must_use]
    pub const fn end_ms(&self) -> u32 {
        self.delay_ms.saturating_add(self.duration_ms)
    }

    /// Samples the animation at `elapsed_ms` since session start.
    ///
    /// Returns `None` before the wave spawns and after the lifespan ends.
    #[must_use]
    pub fn sample(&self, elapsed_ms: f32) -> Option<KeyframeState> {
        let local = elapsed_ms - self.delay_ms as f32;
        let duration = self.duration_ms as f32;
        if local < 0.0 || local > duration {
            return None;
        }

        let progress = if self.duration_ms == 0 {
            1.0
        } else {
            local / duration
        };
        let eased = self.easing.apply(progress);
        let (opacity, scale) = self.fade.sample(progress);

        Some(KeyframeState {
            position: self.start.position.lerp(self.end.position, eased),
            rotation_deg: self.start.rotation_deg
                + (self.end.rotation_deg - self.start.rotation_deg) * eased,
            opacity,
            scale,
        })
    }
}
