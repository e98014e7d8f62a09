//! # Emission Scheduler
//!
//! Plans a session's timeline: one synchronous initial wave, then
//! `trailing_burst_count` timed bursts, then exactly one completion timer.
//!
//! ```text
//! t=0          t=interval   t=2·interval          t=total_duration
//!  │ initial      │ trailing 1  │ trailing 2 ...       │ complete
//!  ▼              ▼             ▼                      ▼
//! ```

use fanfare_shared::Vec2;
use rand::Rng;

use crate::particle::{EmissionWave, IdAllocator, SessionId, WaveId, WaveKind};
use crate::profile::IntensityProfile;
use crate::timer::{TimerAction, TimerId, TimerSet};
use crate::trajectory::{BurstParams, TrajectoryGenerator};

/// Timers armed for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    /// Trailing burst timers with their deadlines, in burst order.
    pub trailing: Vec<(TimerId, u64)>,
    /// The single completion timer.
    pub completion: TimerId,
    /// Completion deadline (clock milliseconds).
    pub completes_at_ms: u64,
}

/// Builds waves and arms session timers.
pub struct EmissionScheduler;

impl EmissionScheduler {
    /// Spawn offset of wave `burst` from the session start (0 = initial).
    #[must_use]
    pub const fn wave_offset_ms(profile: &IntensityProfile, burst: u32) -> u32 {
        profile.trailing_burst_interval_ms.saturating_mul(burst)
    }

    /// Arms every trailing burst and the completion timer.
    pub fn schedule(
        profile: &IntensityProfile,
        started_at_ms: u64,
        timers: &mut TimerSet,
    ) -> Schedule {
        let trailing = (1..=profile.trailing_burst_count)
            .map(|burst| {
                let due = started_at_ms.saturating_add(u64::from(Self::wave_offset_ms(profile, burst)));
                (timers.arm(due, TimerAction::TrailingBurst { burst }), due)
            })
            .collect();

        let completes_at_ms = started_at_ms.saturating_add(u64::from(profile.total_duration_ms));
        let completion = timers.arm(completes_at_ms, TimerAction::Complete);

        Schedule {
            trailing,
            completion,
            completes_at_ms,
        }
    }

    /// Builds the initial wave: full confetti population plus sparkles.
    pub fn initial_wave<R: Rng + ?Sized>(
        rng: &mut R,
        profile: &IntensityProfile,
        origin: Vec2,
        sparkle_count: u32,
        session: SessionId,
        ids: &mut IdAllocator,
    ) -> EmissionWave {
        let id = WaveId { session, index: 0 };
        let params = BurstParams::initial(profile);
        let pieces =
            TrajectoryGenerator::confetti(rng, &params, origin, profile.particle_count, id, ids);
        let sparkles = TrajectoryGenerator::sparkles(rng, origin, sparkle_count, id, ids);

        EmissionWave {
            id,
            kind: WaveKind::Initial,
            spawned_at_ms: 0,
            pieces,
            sparkles,
        }
    }

    /// Builds trailing burst number `burst` (confetti only).
    pub fn trailing_wave<R: Rng + ?Sized>(
        rng: &mut R,
        profile: &IntensityProfile,
        origin: Vec2,
        burst: u32,
        session: SessionId,
        ids: &mut IdAllocator,
    ) -> EmissionWave {
        let id = WaveId {
            session,
            index: burst,
        };
        let params = BurstParams::trailing(profile);
        let pieces =
            TrajectoryGenerator::confetti(rng, &params, origin, profile.trailing_burst_size, id, ids);

        EmissionWave {
            id,
            kind: WaveKind::Trailing { burst },
            spawned_at_ms: Self::wave_offset_ms(profile, burst),
            pieces,
            sparkles: Vec::new(),
        }
    }
}
