//! # Lifecycle Controller
//!
//! [`ConfettiEngine`] owns at most one celebration session at a time.
//!
//! ```text
//!            start()                    update() [complete timer]
//!   ┌──────┐ ─────────> ┌────────┐ ─────────────────────────────> ┌──────┐
//!   │ Idle │            │ Active │            cancel() / drop     │ Idle │
//!   └──────┘ <───────── └────────┘ ─────────────────────────────> └──────┘
//!                         │    ▲
//!                         └────┘ start() again: previous session torn down
//! ```
//!
//! Every session owns its timers. Whichever way a session ends (completion,
//! cancel, re-trigger, drop) the same teardown runs: timers cleared,
//! particles dropped, and the completion callback taken out of the session
//! so it can fire at most once.
//!
//! Callbacks never run while the engine is mid-teardown. Ending a session
//! queues its callback; [`ConfettiEngine::update`] and
//! [`ConfettiEngine::cancel`] run the queue on the way out. Hosts that keep
//! the engine behind a lock use [`ConfettiEngine::fire_due`] /
//! [`ConfettiEngine::cancel_deferred`] and run
//! [`ConfettiEngine::take_completions`] after releasing it, so a callback
//! may lock the engine again.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use fanfare_shared::constants::DEFAULT_SPARKLE_COUNT;
use fanfare_shared::Vec2;
use fanfare_ui::{ParticleSpec, Viewport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{ConfigResult, ProfileResult};
use crate::origin::{OriginHint, OriginResolver};
use crate::particle::{EmissionWave, IdAllocator, SessionId};
use crate::profile::{IntensityProfile, IntensityTier, ProfileTable};
use crate::render_contract;
use crate::scheduler::{EmissionScheduler, Schedule};
use crate::timer::{TimerAction, TimerSet};

/// Callback invoked once when a session ends.
pub type CompletionCallback = Box<dyn FnOnce() + Send>;

/// Arguments to [`ConfettiEngine::start`].
#[derive(Default)]
pub struct StartOptions {
    /// Burst size.
    pub tier: IntensityTier,
    /// Where the burst should start. `None` uses the default origin.
    pub origin_hint: Option<OriginHint>,
    /// Invoked exactly once when the session completes or is cancelled.
    pub on_complete: Option<CompletionCallback>,
}

impl StartOptions {
    /// Options for `tier` with no origin hint and no callback.
    #[must_use]
    pub fn new(tier: IntensityTier) -> Self {
        Self {
            tier,
            ..Self::default()
        }
    }

    /// Sets the origin hint.
    #[must_use]
    pub fn with_origin(mut self, hint: OriginHint) -> Self {
        self.origin_hint = Some(hint);
        self
    }

    /// Sets the completion callback.
    #[must_use]
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for StartOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartOptions")
            .field("tier", &self.tier)
            .field("origin_hint", &self.origin_hint)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Engine lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No session running.
    Idle,
    /// A session is animating.
    Active,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearReason {
    /// The completion timer fired.
    Completed,
    /// The host cancelled the session (or dropped the engine).
    Cancelled,
    /// A new `start` replaced the session.
    Superseded,
}

/// Push-style observer for hosts that do not poll.
pub trait EffectSink: Send {
    /// A wave was emitted (the initial wave during `start`, trailing
    /// bursts during `update`).
    fn wave_emitted(&mut self, _wave: &EmissionWave) {}

    /// A session ended and its particles should be removed.
    fn cleared(&mut self, _session: SessionId, _reason: ClearReason) {}
}

/// One running celebration.
pub struct EngineSession {
    id: SessionId,
    tier: IntensityTier,
    profile: IntensityProfile,
    origin: Vec2,
    started_at_ms: u64,
    timers: TimerSet,
    schedule: Schedule,
    waves: Vec<EmissionWave>,
    on_complete: Option<CompletionCallback>,
}

impl EngineSession {
    /// Session id.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Tier the session was started with.
    #[must_use]
    pub const fn tier(&self) -> IntensityTier {
        self.tier
    }

    /// Profile snapshot taken at start.
    #[must_use]
    pub const fn profile(&self) -> &IntensityProfile {
        &self.profile
    }

    /// Resolved burst origin.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Clock time at start.
    #[must_use]
    pub const fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    /// Timers armed at start.
    #[must_use]
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Waves emitted so far.
    #[must_use]
    pub fn waves(&self) -> &[EmissionWave] {
        &self.waves
    }
}

impl fmt::Debug for EngineSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSession")
            .field("id", &self.id)
            .field("tier", &self.tier)
            .field("origin", &self.origin)
            .field("started_at_ms", &self.started_at_ms)
            .field("pending_timers", &self.timers.len())
            .field("waves", &self.waves.len())
            .field("on_complete", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}

/// Seed derived from the wall clock, used when no seed is configured.
#[allow(clippy::cast_possible_truncation)]
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

/// The celebration engine.
pub struct ConfettiEngine<C: Clock = SystemClock> {
    clock: C,
    profiles: ProfileTable,
    resolver: OriginResolver,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    sparkle_count: u32,
    next_session: u64,
    session: Option<EngineSession>,
    sink: Option<Box<dyn EffectSink>>,
    completions: Vec<CompletionCallback>,
}

impl ConfettiEngine<SystemClock> {
    /// Creates an engine on the system clock with reference profiles.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Creates an engine on the system clock from a loaded config.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured profile is invalid.
    pub fn from_config(config: &EngineConfig) -> ConfigResult<Self> {
        Self::with_config(SystemClock::new(), config)
    }
}

impl Default for ConfettiEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ConfettiEngine<C> {
    /// Creates an engine reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            profiles: ProfileTable::reference(),
            resolver: OriginResolver::default(),
            rng: ChaCha8Rng::seed_from_u64(time_seed()),
            ids: IdAllocator::new(),
            sparkle_count: DEFAULT_SPARKLE_COUNT,
            next_session: 1,
            session: None,
            sink: None,
            completions: Vec::new(),
        }
    }

    /// Creates an engine reading time from `clock`, tuned by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured profile is invalid.
    pub fn with_config(clock: C, config: &EngineConfig) -> ConfigResult<Self> {
        let profiles = config.profile_table()?;
        let mut engine = Self::with_clock(clock);
        engine.profiles = profiles;
        engine.sparkle_count = config.sparkle_count;
        engine.resolver = OriginResolver::new(config.viewport)
            .with_default_origin(config.default_origin);
        if let Some(seed) = config.seed {
            engine.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        Ok(engine)
    }

    /// Reseeds the RNG (same seed + same clock = same celebration).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Attaches a push observer.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn EffectSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Updates the viewport used to resolve element and pixel origins.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.resolver.set_viewport(viewport);
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.resolver.viewport()
    }

    /// Replaces the profile table. Applies from the next `start`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid profile; the current table is kept.
    pub fn set_profiles(&mut self, profiles: ProfileTable) -> ProfileResult<()> {
        profiles.validate()?;
        self.profiles = profiles;
        Ok(())
    }

    /// Current profile table.
    #[must_use]
    pub const fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    /// The engine's clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Starts a celebration, replacing any running one.
    ///
    /// The initial wave is emitted before this returns. A replaced session's
    /// callback is not invoked; it carries over to the new session unless
    /// `options` brings its own.
    pub fn start(&mut self, options: StartOptions) -> SessionId {
        let now_ms = self.clock.now_ms();

        let inherited = self.session.take().and_then(|mut previous| {
            previous.timers.clear();
            tracing::debug!(
                session = previous.id.0,
                waves = previous.waves.len(),
                "Celebration superseded"
            );
            if let Some(sink) = self.sink.as_mut() {
                sink.cleared(previous.id, ClearReason::Superseded);
            }
            previous.on_complete.take()
        });

        let StartOptions {
            tier,
            origin_hint,
            on_complete,
        } = options;
        let profile = *self.profiles.get(tier);
        let origin = self.resolver.resolve(origin_hint.as_ref());

        let id = SessionId(self.next_session);
        self.next_session += 1;

        let mut timers = TimerSet::new();
        let schedule = EmissionScheduler::schedule(&profile, now_ms, &mut timers);
        let initial = EmissionScheduler::initial_wave(
            &mut self.rng,
            &profile,
            origin,
            self.sparkle_count,
            id,
            &mut self.ids,
        );

        tracing::debug!(
            session = id.0,
            %tier,
            x = origin.x,
            y = origin.y,
            particles = initial.len(),
            "Celebration started"
        );
        if let Some(sink) = self.sink.as_mut() {
            sink.wave_emitted(&initial);
        }

        self.session = Some(EngineSession {
            id,
            tier,
            profile,
            origin,
            started_at_ms: now_ms,
            timers,
            schedule,
            waves: vec![initial],
            on_complete: on_complete.or(inherited),
        });
        id
    }

    /// Fires every due timer in deadline order, then runs the completion
    /// callback if the session ended. Returns how many timers fired.
    ///
    /// Timers only advance here. If the host stops calling `update` (a
    /// suspended loop, a backgrounded window) the remaining bursts and the
    /// completion callback wait until it resumes; nothing retries on its own.
    pub fn update(&mut self) -> usize {
        let fired = self.fire_due();
        self.run_completions();
        fired
    }

    /// Like [`update`](Self::update), but a completed session's callback is
    /// queued for [`take_completions`](Self::take_completions) instead of
    /// being run.
    pub fn fire_due(&mut self) -> usize {
        let now_ms = self.clock.now_ms();
        let mut fired = 0;

        loop {
            let Some(session) = self.session.as_mut() else {
                break;
            };
            let Some(timer) = session.timers.pop_due(now_ms) else {
                break;
            };
            fired += 1;

            match timer.action {
                TimerAction::TrailingBurst { burst } => {
                    let wave = EmissionScheduler::trailing_wave(
                        &mut self.rng,
                        &session.profile,
                        session.origin,
                        burst,
                        session.id,
                        &mut self.ids,
                    );
                    tracing::debug!(
                        session = session.id.0,
                        burst,
                        particles = wave.len(),
                        "Trailing burst emitted"
                    );
                    if let Some(sink) = self.sink.as_mut() {
                        sink.wave_emitted(&wave);
                    }
                    session.waves.push(wave);
                }
                TimerAction::Complete => {
                    self.finish(ClearReason::Completed);
                }
            }
        }

        fired
    }

    /// Cancels the running session and fires its callback.
    ///
    /// Returns false if the engine was idle.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.cancel_deferred();
        self.run_completions();
        cancelled
    }

    /// Cancels the running session, queueing its callback for
    /// [`take_completions`](Self::take_completions).
    pub fn cancel_deferred(&mut self) -> bool {
        self.finish(ClearReason::Cancelled)
    }

    /// Callbacks of sessions that ended since the last call, oldest first.
    ///
    /// The caller must run them. Queued callbacks are run on drop.
    #[must_use]
    pub fn take_completions(&mut self) -> Vec<CompletionCallback> {
        std::mem::take(&mut self.completions)
    }

    fn run_completions(&mut self) {
        for callback in self.take_completions() {
            callback();
        }
    }

    fn finish(&mut self, reason: ClearReason) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        session.timers.clear();

        let elapsed_ms = self.clock.now_ms().saturating_sub(session.started_at_ms);
        match reason {
            ClearReason::Completed => tracing::info!(
                "Celebration {} ({}) completed after {}ms, {} waves",
                session.id.0,
                session.tier,
                elapsed_ms,
                session.waves.len()
            ),
            ClearReason::Cancelled | ClearReason::Superseded => tracing::debug!(
                session = session.id.0,
                elapsed_ms,
                ?reason,
                "Celebration cleared"
            ),
        }

        if let Some(sink) = self.sink.as_mut() {
            sink.cleared(session.id, reason);
        }
        if let Some(callback) = session.on_complete.take() {
            self.completions.push(callback);
        }
        true
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        if self.session.is_some() {
            EngineState::Active
        } else {
            EngineState::Idle
        }
    }

    /// Returns true while a session is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Running session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&EngineSession> {
        self.session.as_ref()
    }

    /// Id of the running session.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(EngineSession::id)
    }

    /// Origin of the running session.
    #[must_use]
    pub fn origin(&self) -> Option<Vec2> {
        self.session.as_ref().map(EngineSession::origin)
    }

    /// Waves of the running session (empty when idle).
    #[must_use]
    pub fn waves(&self) -> &[EmissionWave] {
        match &self.session {
            Some(session) => &session.waves,
            None => &[],
        }
    }

    /// Render descriptions for every live wave.
    #[must_use]
    pub fn animations(&self) -> Vec<ParticleSpec> {
        self.waves()
            .iter()
            .flat_map(render_contract::wave_specs)
            .collect()
    }

    /// Armed timers of the running session.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.session.as_ref().map_or(0, |session| session.timers.len())
    }

    /// Next timer deadline (clock milliseconds).
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.session
            .as_ref()
            .and_then(|session| session.timers.next_deadline_ms())
    }

    /// Milliseconds since the running session started.
    #[must_use]
    pub fn elapsed_ms(&self) -> Option<u64> {
        let now_ms = self.clock.now_ms();
        self.session
            .as_ref()
            .map(|session| now_ms.saturating_sub(session.started_at_ms))
    }
}

impl<C: Clock> Drop for ConfettiEngine<C> {
    fn drop(&mut self) {
        self.finish(ClearReason::Cancelled);
        self.run_completions();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use fanfare_ui::Rect;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn engine() -> (ConfettiEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let engine = ConfettiEngine::with_clock(clock.clone()).with_seed(42);
        (engine, clock)
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_low_completes_within_window() {
        let (mut engine, clock) = engine();
        let (done, on_complete) = counter();
        engine.start(StartOptions::new(IntensityTier::Low).on_complete(on_complete));

        clock.set_ms(800);
        engine.update();
        assert!(engine.is_active());
        assert_eq!(done.load(Ordering::SeqCst), 0);

        clock.set_ms(900);
        engine.update();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(engine.waves().is_empty());
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn test_high_centered_element() {
        let (mut engine, clock) = engine();
        engine.set_viewport(Viewport::new(1000.0, 800.0));
        let button = Arc::new(Rect::new(450.0, 350.0, 100.0, 100.0));

        engine.start(StartOptions::new(IntensityTier::High).with_origin(OriginHint::element(&button)));
        assert_eq!(engine.origin(), Some(Vec2::new(50.0, 50.0)));
        assert_eq!(engine.waves().len(), 1);
        assert_eq!(engine.waves()[0].pieces.len(), 100);
        assert_eq!(engine.waves()[0].sparkles.len(), 12);

        clock.set_ms(150);
        assert_eq!(engine.update(), 1);
        assert_eq!(engine.waves().len(), 2);

        clock.set_ms(1_499);
        engine.update();
        assert_eq!(engine.waves().len(), 4);
        assert!(engine.is_active());
    }

    #[test]
    fn test_retrigger_fires_exactly_one_callback() {
        let (mut engine, clock) = engine();
        let (first, first_cb) = counter();
        let (second, second_cb) = counter();

        let old = engine.start(StartOptions::new(IntensityTier::Medium).on_complete(first_cb));
        clock.set_ms(200);
        engine.update();
        let new = engine.start(StartOptions::new(IntensityTier::Medium).on_complete(second_cb));
        assert_ne!(old, new);
        assert!(engine.waves().iter().all(|wave| wave.id.session == new));

        clock.set_ms(5_000);
        engine.update();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_superseded_callback_carries_over() {
        let (mut engine, clock) = engine();
        let (done, on_complete) = counter();

        engine.start(StartOptions::new(IntensityTier::High).on_complete(on_complete));
        clock.set_ms(100);
        engine.start(StartOptions::new(IntensityTier::Low));
        assert_eq!(engine.pending_timers(), 2);

        clock.set_ms(100 + 850);
        engine.update();
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (mut engine, _clock) = engine();
        let (done, on_complete) = counter();
        engine.start(StartOptions::default().on_complete(on_complete));

        assert!(engine.cancel());
        assert!(!engine.cancel());
        assert_eq!(engine.update(), 0);
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(engine.pending_timers(), 0);
        assert!(engine.animations().is_empty());
    }

    #[test]
    fn test_update_after_completion_is_noop() {
        let (mut engine, clock) = engine();
        let (done, on_complete) = counter();
        engine.start(StartOptions::new(IntensityTier::Low).on_complete(on_complete));

        clock.set_ms(10_000);
        engine.update();
        engine.update();
        assert!(!engine.cancel());
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_fires_callback() {
        let (done, on_complete) = counter();
        {
            let (mut engine, _clock) = engine();
            engine.start(StartOptions::default().on_complete(on_complete));
        }
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_completion_waits_for_update() {
        let (mut engine, clock) = engine();
        let (done, on_complete) = counter();
        engine.start(StartOptions::new(IntensityTier::Low).on_complete(on_complete));

        clock.set_ms(60_000);
        assert!(engine.is_active());
        assert_eq!(engine.next_deadline_ms(), Some(120));
        assert_eq!(done.load(Ordering::SeqCst), 0);

        assert_eq!(engine.update(), 2);
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fire_due_queues_callback() {
        let (mut engine, clock) = engine();
        let (done, on_complete) = counter();
        engine.start(StartOptions::new(IntensityTier::Low).on_complete(on_complete));

        clock.set_ms(850);
        assert_eq!(engine.fire_due(), 2);
        assert!(!engine.is_active());
        assert_eq!(done.load(Ordering::SeqCst), 0);

        let completions = engine.take_completions();
        assert_eq!(completions.len(), 1);
        for callback in completions {
            callback();
        }
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(engine.take_completions().is_empty());
    }

    #[test]
    fn test_cancel_deferred_runs_on_drop() {
        let (done, on_complete) = counter();
        {
            let (mut engine, _clock) = engine();
            engine.start(StartOptions::default().on_complete(on_complete));
            assert!(engine.cancel_deferred());
            assert_eq!(done.load(Ordering::SeqCst), 0);
        }
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_same_seed_same_celebration() {
        let (mut a, _) = engine();
        let (mut b, _) = engine();
        a.start(StartOptions::default());
        b.start(StartOptions::default());
        assert_eq!(a.waves(), b.waves());
    }

    #[test]
    fn test_sink_sees_waves_and_clear() {
        struct Recorder {
            waves: Arc<AtomicUsize>,
            cleared: Arc<AtomicUsize>,
        }
        impl EffectSink for Recorder {
            fn wave_emitted(&mut self, _wave: &EmissionWave) {
                self.waves.fetch_add(1, Ordering::SeqCst);
            }
            fn cleared(&mut self, _session: SessionId, reason: ClearReason) {
                assert_eq!(reason, ClearReason::Completed);
                self.cleared.fetch_add(1, Ordering::SeqCst);
            }
        }

        let waves = Arc::new(AtomicUsize::new(0));
        let cleared = Arc::new(AtomicUsize::new(0));
        let (engine, clock) = engine();
        let mut engine = engine.with_sink(Box::new(Recorder {
            waves: Arc::clone(&waves),
            cleared: Arc::clone(&cleared),
        }));

        engine.start(StartOptions::new(IntensityTier::Medium));
        clock.set_ms(1_200);
        assert_eq!(engine.update(), 3);
        assert_eq!(waves.load(Ordering::SeqCst), 3);
        assert_eq!(cleared.load(Ordering::SeqCst), 1);
    }
}
