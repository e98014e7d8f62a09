//! # Particle Model
//!
//! Immutable particle descriptors produced by the trajectory generator.
//! A particle never changes after creation: the host interpolates between
//! the keyframes the render contract derives from it.

use fanfare_shared::Vec2;
use fanfare_ui::{Color, Depth, ParticleShape};

/// Identifier of one particle, unique within an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u64);

/// Identifier of one celebration session, unique within an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

/// Monotonic particle id source owned by one engine.
///
/// Ids are never reused, so render keys stay stable across re-triggers.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator starting at id 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> ParticleId {
        let id = ParticleId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.next
    }
}

/// Identifier of one emission wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaveId {
    /// Owning session.
    pub session: SessionId,
    /// Wave index inside the session (0 = initial wave).
    pub index: u32,
}

/// Why a wave was emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaveKind {
    /// Burst dispatched synchronously by `start`.
    Initial,
    /// Timed follow-up burst (1-based).
    Trailing {
        /// Burst number.
        burst: u32,
    },
}

/// One confetti piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfettiPiece {
    /// Particle id.
    pub id: ParticleId,
    /// Wave the piece belongs to.
    pub wave: WaveId,
    /// Burst origin (viewport percent).
    pub origin: Vec2,
    /// Start offset from the origin.
    pub jitter: Vec2,
    /// Launch velocity (viewport percent, y down).
    pub velocity: Vec2,
    /// Launch direction (-90 = straight up).
    pub launch_angle_deg: f32,
    /// Fill color.
    pub color: Color,
    /// Initial rotation (degrees).
    pub rotation_deg: f32,
    /// Spin speed (degrees per second, signed).
    pub rotation_speed_deg_per_sec: f32,
    /// Edge length / diameter (viewport percent).
    pub size: f32,
    /// Silhouette.
    pub shape: ParticleShape,
    /// Gravity copied from the profile.
    pub gravity: f32,
    /// Drag copied from the profile.
    pub drag: f32,
    /// Lifespan (ms).
    pub lifespan_ms: u32,
    /// Parallax layer.
    pub depth: Depth,
}

impl ConfettiPiece {
    /// Spawn position (origin plus jitter).
    #[must_use]
    pub fn start_position(&self) -> Vec2 {
        self.origin + self.jitter
    }

    /// Launch speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// One sparkle glow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparkleParticle {
    /// Particle id.
    pub id: ParticleId,
    /// Wave the sparkle belongs to.
    pub wave: WaveId,
    /// Burst origin (viewport percent).
    pub origin: Vec2,
    /// Travel vector (any direction).
    pub velocity: Vec2,
    /// Glow diameter (viewport percent).
    pub size: f32,
    /// Lifespan (ms).
    pub lifespan_ms: u32,
}

/// All particles spawned together.
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionWave {
    /// Wave id.
    pub id: WaveId,
    /// Initial or trailing.
    pub kind: WaveKind,
    /// Spawn offset from the session start (ms).
    pub spawned_at_ms: u32,
    /// Confetti pieces.
    pub pieces: Vec<ConfettiPiece>,
    /// Sparkles (initial wave only).
    pub sparkles: Vec<SparkleParticle>,
}

impl EmissionWave {
    /// Total particles in the wave.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len() + self.sparkles.len()
    }

    /// Returns true if the wave holds no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty() && self.sparkles.is_empty()
    }

    /// Session time (ms) at which the wave's last particle is gone.
    #[must_use]
    pub fn ends_at_ms(&self) -> u32 {
        let confetti = self.pieces.iter().map(|p| p.lifespan_ms);
        let sparkles = self.sparkles.iter().map(|s| s.lifespan_ms);
        self.spawned_at_ms
            .saturating_add(confetti.chain(sparkles).max().unwrap_or(0))
    }
}
