//! # Render Contract
//!
//! Maps immutable particles onto declarative two-keyframe animations. The
//! engine never recomputes positions: hosts interpolate these curves
//! themselves or hand them to a `KeyframeSampler`.
//!
//! End keyframe for confetti:
//!
//! ```text
//! x = origin.x + vx · (1 − 2·drag)
//! y = origin.y + vy · RISE_FACTOR + gravity · FALL_FACTOR
//! rotation = initial + spin · SPIN_FACTOR
//! ```

use fanfare_shared::constants::{FALL_FACTOR, RISE_FACTOR, SPIN_FACTOR};
use fanfare_shared::Vec2;
use fanfare_ui::{
    Easing, FadeCurve, KeyframeState, LayerStyle, ParticleAnimation, ParticleSpec,
    ParticleVisual, RenderKey, VisualKind,
};

use crate::particle::{ConfettiPiece, EmissionWave, SparkleParticle, WaveId};

/// Resting state reached at the end of a particle's lifespan.
const fn gone(position: Vec2, rotation_deg: f32) -> KeyframeState {
    KeyframeState {
        position,
        rotation_deg,
        opacity: 0.0,
        scale: 0.0,
    }
}

/// Displacement from the origin to the confetti rest position.
#[must_use]
pub fn end_displacement(piece: &ConfettiPiece) -> Vec2 {
    Vec2::new(
        piece.velocity.x * (1.0 - 2.0 * piece.drag),
        piece.velocity.y * RISE_FACTOR + piece.gravity * FALL_FACTOR,
    )
}

/// Keyframes for one confetti piece spawned with `wave`.
#[must_use]
pub fn confetti_animation(piece: &ConfettiPiece, wave: &EmissionWave) -> ParticleAnimation {
    let end_rotation = piece.rotation_deg + piece.rotation_speed_deg_per_sec * SPIN_FACTOR;
    ParticleAnimation {
        delay_ms: wave.spawned_at_ms,
        duration_ms: piece.lifespan_ms,
        start: KeyframeState::visible(piece.start_position(), piece.rotation_deg),
        end: gone(piece.origin + end_displacement(piece), end_rotation),
        fade: FadeCurve::CONFETTI,
        easing: Easing::ExponentialOut,
    }
}

/// Keyframes for one sparkle spawned with `wave`. Sparkles ignore gravity.
#[must_use]
pub fn sparkle_animation(sparkle: &SparkleParticle, wave: &EmissionWave) -> ParticleAnimation {
    ParticleAnimation {
        delay_ms: wave.spawned_at_ms,
        duration_ms: sparkle.lifespan_ms,
        start: KeyframeState::visible(sparkle.origin, 0.0),
        end: gone(sparkle.origin + sparkle.velocity, 0.0),
        fade: FadeCurve::SPARKLE,
        easing: Easing::ExponentialOut,
    }
}

fn render_key(wave: WaveId, particle: u64) -> RenderKey {
    RenderKey {
        session: wave.session.0,
        wave: wave.index,
        particle,
    }
}

/// Full render description of a confetti piece.
#[must_use]
pub fn confetti_spec(piece: &ConfettiPiece, wave: &EmissionWave) -> ParticleSpec {
    ParticleSpec {
        key: render_key(piece.wave, piece.id.0),
        visual: ParticleVisual {
            kind: VisualKind::Confetti {
                shape: piece.shape,
                color: piece.color,
            },
            size: piece.size,
            layer: piece.depth.layer_style(),
        },
        animation: confetti_animation(piece, wave),
    }
}

/// Full render description of a sparkle.
#[must_use]
pub fn sparkle_spec(sparkle: &SparkleParticle, wave: &EmissionWave) -> ParticleSpec {
    ParticleSpec {
        key: render_key(sparkle.wave, sparkle.id.0),
        visual: ParticleVisual {
            kind: VisualKind::Sparkle,
            size: sparkle.size,
            layer: LayerStyle::NEAR,
        },
        animation: sparkle_animation(sparkle, wave),
    }
}

/// Render descriptions for every particle of a wave, confetti first.
#[must_use]
pub fn wave_specs(wave: &EmissionWave) -> Vec<ParticleSpec> {
    let confetti = wave.pieces.iter().map(|piece| confetti_spec(piece, wave));
    let sparkles = wave.sparkles.iter().map(|sparkle| sparkle_spec(sparkle, wave));
    confetti.chain(sparkles).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{ParticleId, SessionId, WaveKind};
    use fanfare_ui::{Color, Depth, ParticleShape};

    fn piece(depth: Depth) -> ConfettiPiece {
        ConfettiPiece {
            id: ParticleId(4),
            wave: WaveId {
                session: SessionId(2),
                index: 1,
            },
            origin: Vec2::new(50.0, 40.0),
            jitter: Vec2::new(1.0, -1.0),
            velocity: Vec2::new(10.0, -20.0),
            launch_angle_deg: -63.4,
            color: Color::WHITE,
            rotation_deg: 30.0,
            rotation_speed_deg_per_sec: -200.0,
            size: 1.2,
            shape: ParticleShape::Rectangle,
            gravity: 22.0,
            drag: 0.15,
            lifespan_ms: 600,
            depth,
        }
    }

    fn wave(pieces: Vec<ConfettiPiece>, sparkles: Vec<SparkleParticle>) -> EmissionWave {
        EmissionWave {
            id: WaveId {
                session: SessionId(2),
                index: 1,
            },
            kind: WaveKind::Trailing { burst: 1 },
            spawned_at_ms: 150,
            pieces,
            sparkles,
        }
    }

    #[test]
    fn test_confetti_end_keyframe() {
        let piece = piece(Depth::Near);
        let anim = confetti_animation(&piece, &wave(vec![piece], Vec::new()));

        assert_eq!(anim.start.position, Vec2::new(51.0, 39.0));
        assert_eq!(anim.start.rotation_deg, 30.0);
        // x: 50 + 10 · 0.7, y: 40 − 20 · 0.3 + 22 · 0.8
        assert!((anim.end.position.x - 57.0).abs() < 1e-4);
        assert!((anim.end.position.y - 51.6).abs() < 1e-4);
        assert!((anim.end.rotation_deg - (30.0 - 240.0)).abs() < 1e-3);
        assert_eq!(anim.end.opacity, 0.0);
    }

    #[test]
    fn test_fade_is_timed_to_lifespan_and_wave() {
        let piece = piece(Depth::Near);
        let anim = confetti_animation(&piece, &wave(vec![piece], Vec::new()));

        assert_eq!(anim.delay_ms, 150);
        assert_eq!(anim.end_ms(), 750);
        assert!(anim.sample(149.0).is_none());
        // 60% through the lifespan: still fully opaque
        let hold = anim.sample(150.0 + 360.0).map(|s| s.opacity);
        assert_eq!(hold, Some(1.0));
        let last = anim.sample(750.0).map(|s| s.opacity);
        assert_eq!(last, Some(0.0));
    }

    #[test]
    fn test_far_pieces_get_far_layer() {
        let spec = confetti_spec(&piece(Depth::Far), &wave(Vec::new(), Vec::new()));
        assert_eq!(spec.visual.layer, LayerStyle::FAR);
        assert_eq!(
            spec.key,
            RenderKey {
                session: 2,
                wave: 1,
                particle: 4,
            }
        );
    }

    #[test]
    fn test_sparkles_ignore_gravity() {
        let sparkle = SparkleParticle {
            id: ParticleId(9),
            wave: WaveId {
                session: SessionId(2),
                index: 1,
            },
            origin: Vec2::new(50.0, 50.0),
            velocity: Vec2::new(0.0, -10.0),
            size: 0.6,
            lifespan_ms: 400,
        };
        let wave = wave(vec![piece(Depth::Near)], vec![sparkle]);
        let specs = wave_specs(&wave);

        assert_eq!(specs.len(), 2);
        assert!(matches!(specs[0].visual.kind, VisualKind::Confetti { .. }));
        let glow = &specs[1];
        assert_eq!(glow.visual.kind, VisualKind::Sparkle);
        assert_eq!(glow.animation.end.position, Vec2::new(50.0, 40.0));
        assert_eq!(glow.animation.fade, FadeCurve::SPARKLE);
    }
}
