//! # Async Driver
//!
//! For hosts without a frame loop: a tokio task ticks a shared engine at a
//! fixed interval until it goes idle. The engine is only touched under its
//! lock, and the lock is never held across an `.await` or while a
//! completion callback runs, so callbacks may lock the engine themselves.

use std::sync::Arc;
use std::time::Duration;

use fanfare_effects::{Clock, ConfettiEngine};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Engine handle shared between the host and the driver.
pub type SharedEngine<C> = Arc<Mutex<ConfettiEngine<C>>>;

/// Clock backed by tokio's time source, so paused test runtimes drive it.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    epoch: Instant,
}

impl TokioClock {
    /// Starts a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Counters from one driver run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Ticks executed.
    pub ticks: u64,
    /// Engine timers fired.
    pub timers_fired: usize,
}

/// Wraps an engine for sharing with a driver.
pub fn share<C: Clock>(engine: ConfettiEngine<C>) -> SharedEngine<C> {
    Arc::new(Mutex::new(engine))
}

/// Ticks `engine` every `tick` until it is idle.
///
/// Returns immediately (after one tick) if no session is running.
/// Completion callbacks run after the lock is released.
///
/// Timers only advance while this task is polled. If the runtime stalls or
/// the task is aborted, the completion callback is delayed until something
/// calls `update` on the engine again (or runs on drop).
pub async fn run_until_idle<C: Clock>(engine: SharedEngine<C>, tick: Duration) -> DriverStats {
    let mut interval = time::interval(tick.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats = DriverStats::default();

    loop {
        interval.tick().await;
        let (fired, active, completions) = {
            let mut engine = engine.lock();
            let fired = engine.fire_due();
            (fired, engine.is_active(), engine.take_completions())
        };
        for callback in completions {
            callback();
        }
        stats.ticks += 1;
        stats.timers_fired += fired;
        if !active {
            break;
        }
    }

    tracing::debug!(ticks = stats.ticks, timers = stats.timers_fired, "Driver idle");
    stats
}

/// Cancels the shared engine's session, running its callback after the
/// lock is released. Returns false if the engine was idle.
pub fn cancel<C: Clock>(engine: &SharedEngine<C>) -> bool {
    let (cancelled, completions) = {
        let mut engine = engine.lock();
        (engine.cancel_deferred(), engine.take_completions())
    };
    for callback in completions {
        callback();
    }
    cancelled
}

/// Spawns [`run_until_idle`] on the current runtime.
pub fn spawn<C>(engine: SharedEngine<C>, tick: Duration) -> JoinHandle<DriverStats>
where
    C: Clock + 'static,
{
    tokio::spawn(run_until_idle(engine, tick))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanfare_effects::{IntensityTier, StartOptions};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_low_session_runs_to_completion() {
        let engine = share(ConfettiEngine::with_clock(TokioClock::new()).with_seed(3));
        let done = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&done);

        let started = Instant::now();
        engine.lock().start(StartOptions::new(IntensityTier::Low).on_complete(move || {
            handle.fetch_add(1, Ordering::SeqCst);
        }));

        let stats = run_until_idle(Arc::clone(&engine), Duration::from_millis(16)).await;
        let elapsed = started.elapsed();

        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(stats.timers_fired, 2);
        assert!(elapsed >= Duration::from_millis(850), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(900), "{elapsed:?}");
        assert!(!engine.lock().is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_engine_returns_immediately() {
        let engine = share(ConfettiEngine::with_clock(TokioClock::new()));
        let stats = run_until_idle(engine, Duration::from_millis(16)).await;
        assert_eq!(stats, DriverStats { ticks: 1, timers_fired: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_driver_sees_cancel() {
        let engine = share(ConfettiEngine::with_clock(TokioClock::new()));
        engine.lock().start(StartOptions::new(IntensityTier::High));

        let driver = spawn(Arc::clone(&engine), Duration::from_millis(16));
        time::sleep(Duration::from_millis(200)).await;
        assert!(cancel(&engine));

        let stats = driver.await.unwrap();
        // Trailing bursts at 150ms only
        assert_eq!(stats.timers_fired, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_can_lock_the_engine() {
        let engine = share(ConfettiEngine::with_clock(TokioClock::new()).with_seed(5));
        let handle = Arc::clone(&engine);
        let seen_idle = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&seen_idle);

        engine.lock().start(StartOptions::new(IntensityTier::Low).on_complete(move || {
            if !handle.lock().is_active() {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        }));

        let run = run_until_idle(Arc::clone(&engine), Duration::from_millis(16));
        let stats = time::timeout(Duration::from_secs(5), run)
            .await
            .expect("driver blocked inside the completion callback");
        assert_eq!(stats.timers_fired, 2);
        assert_eq!(seen_idle.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_can_restart_after_cancel() {
        let engine = share(ConfettiEngine::with_clock(TokioClock::new()).with_seed(6));
        let handle = Arc::clone(&engine);

        engine.lock().start(StartOptions::new(IntensityTier::Medium).on_complete(move || {
            handle.lock().start(StartOptions::new(IntensityTier::Low));
        }));

        assert!(cancel(&engine));
        let session = engine.lock().session().map(|s| s.tier());
        assert_eq!(session, Some(IntensityTier::Low));
    }
}
