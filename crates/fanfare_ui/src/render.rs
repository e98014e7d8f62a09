//! Renderer adapter.
//!
//! Hosts with native keyframe animation consume [`ParticleSpec`]s directly.
//! Everyone else feeds them through a [`KeyframeSampler`], which evaluates
//! the curves at a fixed tick rate and produces draw commands or a GPU
//! instance buffer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::animation::ParticleAnimation;
use crate::layout::Viewport;
use crate::style::{Color, LayerStyle, SPARKLE_GLOW};

/// Confetti piece silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    /// Paper strip.
    Rectangle,
    /// Round dot.
    Circle,
    /// Five-point star.
    Star,
}

impl ParticleShape {
    /// All shapes, in weight-table order.
    pub const ALL: [Self; 3] = [Self::Rectangle, Self::Circle, Self::Star];

    /// Stable numeric id used in GPU instance data.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Rectangle => 0,
            Self::Circle => 1,
            Self::Star => 2,
        }
    }
}

/// Stable key for one rendered particle.
///
/// Unique across sessions and waves of the same engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderKey {
    /// Session that spawned the particle.
    pub session: u64,
    /// Wave index inside the session (0 = initial wave).
    pub wave: u32,
    /// Particle id.
    pub particle: u64,
}

/// What to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualKind {
    /// Colored confetti piece.
    Confetti {
        /// Silhouette.
        shape: ParticleShape,
        /// Fill color.
        color: Color,
    },
    /// White glow.
    Sparkle,
}

/// Static appearance of a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleVisual {
    /// Kind of particle.
    pub kind: VisualKind,
    /// Base size in viewport percent (of the shorter side).
    pub size: f32,
    /// Depth layer styling.
    pub layer: LayerStyle,
}

/// Everything a host needs to animate one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    /// Render key.
    pub key: RenderKey,
    /// Appearance.
    pub visual: ParticleVisual,
    /// Motion and fade keyframes.
    pub animation: ParticleAnimation,
}

/// A draw command for one sampled particle (pixels).
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Confetti piece.
    Confetti {
        /// Render key.
        key: RenderKey,
        /// Silhouette.
        shape: ParticleShape,
        /// Center X.
        x: f32,
        /// Center Y.
        y: f32,
        /// Edge length / diameter.
        size: f32,
        /// Rotation in degrees.
        rotation_deg: f32,
        /// Color with faded alpha.
        color: Color,
        /// Blur radius.
        blur_px: f32,
    },
    /// Sparkle glow.
    Sparkle {
        /// Render key.
        key: RenderKey,
        /// Center X.
        x: f32,
        /// Center Y.
        y: f32,
        /// Glow radius.
        radius: f32,
        /// Glow color with faded alpha.
        color: Color,
    },
}

/// GPU-side instance data for one sampled particle.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Center (xy, pixels) + size (z, pixels) + rotation (w, degrees)
    pub position_size_rotation: [f32; 4],
    /// Color (rgba, alpha already faded)
    pub color: [f32; 4],
    /// Blur (x), shape id (y, 3 = sparkle), reserved (zw)
    pub params: [f32; 4],
}

impl ParticleInstance {
    /// Size of an instance in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Shape id used for sparkles.
    pub const SPARKLE_SHAPE_ID: u32 = 3;
}

/// Samples keyframe animations at a fixed tick rate.
#[derive(Debug)]
pub struct KeyframeSampler {
    /// Tick length in milliseconds.
    tick_ms: f32,
    /// Last sampled tick (skip work if the host calls twice per tick).
    last_tick: Option<u64>,
    /// Commands from the last sample.
    commands: Vec<RenderCommand>,
    /// Instances from the last sample.
    instances: Vec<ParticleInstance>,
}

impl KeyframeSampler {
    /// Default sample rate.
    pub const DEFAULT_RATE_HZ: u32 = 60;

    /// Creates a sampler running at `sample_rate_hz` (0 is treated as 1).
    #[must_use]
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            tick_ms: 1000.0 / sample_rate_hz.max(1) as f32,
            last_tick: None,
            commands: Vec::with_capacity(256),
            instances: Vec::with_capacity(256),
        }
    }

    /// Tick length in milliseconds.
    #[must_use]
    pub const fn tick_ms(&self) -> f32 {
        self.tick_ms
    }

    /// Samples `particles` at the tick containing `elapsed_ms`.
    ///
    /// Returns `false` (and keeps the previous output) if that tick was
    /// already sampled.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample<'a, I>(&mut self, elapsed_ms: f32, particles: I, viewport: Viewport) -> bool
    where
        I: IntoIterator<Item = &'a ParticleSpec>,
    {
        let tick = (elapsed_ms.max(0.0) / self.tick_ms) as u64;
        if self.last_tick == Some(tick) {
            return false;
        }
        self.last_tick = Some(tick);

        let t = tick as f32 * self.tick_ms;
        self.commands.clear();
        self.instances.clear();

        for spec in particles {
            let Some(state) = spec.animation.sample(t) else {
                continue;
            };
            let layer = spec.visual.layer;
            let opacity = state.opacity * layer.opacity;
            if opacity <= 0.0 {
                continue;
            }

            let (x, y) = viewport.to_pixels(state.position);
            let size = viewport.length_to_pixels(spec.visual.size) * state.scale * layer.scale;

            let (command, color, shape_id) = match spec.visual.kind {
                VisualKind::Confetti { shape, color } => {
                    let color = color.fade(opacity);
                    (
                        RenderCommand::Confetti {
                            key: spec.key,
                            shape,
                            x,
                            y,
                            size,
                            rotation_deg: state.rotation_deg,
                            color,
                            blur_px: layer.blur_px,
                        },
                        color,
                        shape.id(),
                    )
                }
                VisualKind::Sparkle => {
                    let color = SPARKLE_GLOW.fade(opacity);
                    (
                        RenderCommand::Sparkle {
                            key: spec.key,
                            x,
                            y,
                            radius: size * 0.5,
                            color,
                        },
                        color,
                        ParticleInstance::SPARKLE_SHAPE_ID,
                    )
                }
            };

            self.commands.push(command);
            self.instances.push(ParticleInstance {
                position_size_rotation: [x, y, size, state.rotation_deg],
                color: color.to_array(),
                params: [layer.blur_px, shape_id as f32, 0.0, 0.0],
            });
        }

        true
    }

    /// Commands from the last sample.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Instance buffer from the last sample, ready for upload.
    #[must_use]
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Instance buffer as raw bytes.
    #[must_use]
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Drops all output (call when the overlay is hidden).
    pub fn reset(&mut self) {
        self.last_tick = None;
        self.commands.clear();
        self.instances.clear();
    }
}

impl Default for KeyframeSampler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATE_HZ)
    }
}
