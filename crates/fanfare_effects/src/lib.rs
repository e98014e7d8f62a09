//! # FANFARE Effects
//!
//! The celebration engine: turns "celebrate now, here, this big" into a
//! timed population of confetti and sparkles, and guarantees that every
//! session ends exactly once.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ConfettiEngine                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  start() ─> OriginResolver ─> TrajectoryGenerator ─> waves    │
//! │     │                               ▲                         │
//! │     └──> EmissionScheduler ─> TimerSet ─ update() ─┘          │
//! │                                                               │
//! │  waves ─> render_contract ─> ParticleSpec (host renders)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Deterministic**: seeded `ChaCha8Rng` + injected [`Clock`]
//! - **Leak-free**: timers belong to a session and die with it
//! - **Exactly-once**: the completion callback is an `FnOnce` taken out of
//!   the session on teardown
//! - **Infallible core**: bad hints and unknown tiers degrade to defaults

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod origin;
pub mod particle;
pub mod profile;
pub mod render_contract;
pub mod scheduler;
pub mod timer;
pub mod trajectory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, ProfileOverrides};
pub use engine::{
    ClearReason, CompletionCallback, ConfettiEngine, EffectSink, EngineSession, EngineState,
    StartOptions,
};
pub use error::{ConfigError, ConfigResult, ProfileError, ProfileResult};
pub use origin::{OriginHint, OriginResolver, TriggerElement};
pub use particle::{
    ConfettiPiece, EmissionWave, IdAllocator, ParticleId, SessionId, SparkleParticle, WaveId,
    WaveKind,
};
pub use profile::{IntensityProfile, IntensityTier, ProfileTable, ShapeWeights, Span};
pub use scheduler::{EmissionScheduler, Schedule};
pub use timer::{DueTimer, TimerAction, TimerId, TimerSet};
pub use trajectory::{BurstParams, TrajectoryGenerator};
