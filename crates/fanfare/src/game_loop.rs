//! # Celebration Loop
//!
//! Per-frame orchestration for hosts with a render loop:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. DRAIN REQUESTS                                                   │
//! │    └─ Latest request wins; earlier ones in the batch are skipped    │
//! │                                                                     │
//! │ 2. ENGINE UPDATE                                                    │
//! │    └─ Fire due trailing bursts / completion, then run callbacks     │
//! │                                                                     │
//! │ 3. SAMPLE                                                           │
//! │    └─ Evaluate live keyframes at the session time → draw commands   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fanfare_effects::{Clock, ConfettiEngine, ConfigResult, EngineConfig, SessionId, SystemClock};
use fanfare_ui::{KeyframeSampler, ParticleInstance, RenderCommand, Viewport};

use crate::events::{EventBus, EventReceiver, EventSender};

/// Configuration for the celebration loop.
#[derive(Clone, Debug)]
pub struct LoopConfig {
    /// Request channel capacity.
    pub event_capacity: usize,
    /// Keyframe sampling rate.
    pub sample_rate_hz: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            sample_rate_hz: KeyframeSampler::DEFAULT_RATE_HZ,
        }
    }
}

/// What happened during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number.
    pub frame: u64,
    /// Requests drained this frame.
    pub requests: usize,
    /// Session started this frame, if any.
    pub started: Option<SessionId>,
    /// Engine timers fired this frame.
    pub timers_fired: usize,
    /// Particles drawn this frame.
    pub particles_drawn: usize,
}

/// Owns one engine and feeds it from the celebration bus.
pub struct CelebrationLoop<C: Clock = SystemClock> {
    /// The engine (one per host).
    engine: ConfettiEngine<C>,
    /// Sender handed out to UI surfaces.
    sender: EventSender,
    /// Incoming requests.
    receiver: EventReceiver,
    /// Renderer adapter.
    sampler: KeyframeSampler,
    /// Sessions that reached their completion callback.
    completed: Arc<AtomicU64>,
    /// Frame counter.
    frame_count: u64,
}

impl CelebrationLoop<SystemClock> {
    /// Creates a loop on the system clock from an engine config.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured profile is invalid.
    pub fn from_config(config: &EngineConfig) -> ConfigResult<Self> {
        let engine = ConfettiEngine::from_config(config)?;
        let loop_config = LoopConfig {
            sample_rate_hz: config.sample_rate_hz,
            ..LoopConfig::default()
        };
        Ok(Self::with_engine(engine, &loop_config))
    }
}

impl<C: Clock> CelebrationLoop<C> {
    /// Wraps an existing engine.
    pub fn with_engine(engine: ConfettiEngine<C>, config: &LoopConfig) -> Self {
        let bus = EventBus::new(config.event_capacity);
        Self {
            engine,
            sender: bus.sender(),
            receiver: bus.receiver(),
            sampler: KeyframeSampler::new(config.sample_rate_hz),
            completed: Arc::new(AtomicU64::new(0)),
            frame_count: 0,
        }
    }

    /// Sender for UI surfaces (clone freely).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Runs one frame.
    pub fn frame(&mut self) -> FrameReport {
        let requests = self.receiver.drain();
        let request_count = requests.len();
        if request_count > 1 {
            tracing::debug!(
                skipped = request_count - 1,
                "Multiple celebrations in one frame, keeping the latest"
            );
        }

        let started = requests.into_iter().last().map(|request| {
            let completed = Arc::clone(&self.completed);
            let celebration = request.celebration;
            let options = request.into_start_options().on_complete(move || {
                completed.fetch_add(1, Ordering::Relaxed);
            });
            let session = self.engine.start(options);
            tracing::debug!(celebration = celebration.name(), session = session.0, "Celebration requested");
            session
        });

        let timers_fired = self.engine.fire_due();
        for callback in self.engine.take_completions() {
            callback();
        }

        // A new session restarts session time at zero
        if started.is_some() {
            self.sampler.reset();
        }

        let particles_drawn = match self.engine.elapsed_ms() {
            Some(elapsed_ms) => {
                let specs = self.engine.animations();
                self.sampler
                    .sample(elapsed_ms as f32, &specs, self.engine.viewport());
                self.sampler.commands().len()
            }
            None => {
                self.sampler.reset();
                0
            }
        };

        let report = FrameReport {
            frame: self.frame_count,
            requests: request_count,
            started,
            timers_fired,
            particles_drawn,
        };
        self.frame_count += 1;
        report
    }

    /// Draw commands from the last frame.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        self.sampler.commands()
    }

    /// GPU instances from the last frame.
    #[must_use]
    pub fn instances(&self) -> &[ParticleInstance] {
        self.sampler.instances()
    }

    /// Updates the viewport (call on resize).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.engine.set_viewport(viewport);
    }

    /// The engine.
    #[must_use]
    pub const fn engine(&self) -> &ConfettiEngine<C> {
        &self.engine
    }

    /// The engine, mutably (cancel, profile swaps).
    pub fn engine_mut(&mut self) -> &mut ConfettiEngine<C> {
        &mut self.engine
    }

    /// Sessions that completed or were cancelled.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Frames run so far.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
