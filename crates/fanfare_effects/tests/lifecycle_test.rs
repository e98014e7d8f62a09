//! # Celebration Lifecycle Integration Test
//!
//! Drives full sessions through the public API on a manual clock and checks
//! the timing and exactly-once guarantees end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fanfare_effects::{
    ConfettiEngine, EngineState, IntensityProfile, IntensityTier, ManualClock, OriginHint,
    ProfileTable, StartOptions,
};
use fanfare_shared::Vec2;
use fanfare_ui::{KeyframeSampler, Rect, Viewport};

fn engine(seed: u64) -> (ConfettiEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new(10_000);
    (ConfettiEngine::with_clock(clock.clone()).with_seed(seed), clock)
}

fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&count);
    (count, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

/// Low tier: nothing before 800ms, exactly one completion by 900ms.
#[test]
fn test_low_tier_completion_window() {
    let (mut engine, clock) = engine(1);
    let (done, on_complete) = counter();
    engine.start(StartOptions::new(IntensityTier::Low).on_complete(on_complete));

    // Step like a 60 Hz host
    for ms in (0..800).step_by(16) {
        clock.set_ms(10_000 + ms);
        engine.update();
        assert_eq!(done.load(Ordering::SeqCst), 0, "completed early at {ms}ms");
    }
    for ms in (800..=900).step_by(16) {
        clock.set_ms(10_000 + ms);
        engine.update();
    }

    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(engine.state(), EngineState::Idle);
}

/// High tier from a centered element: origin (50, 50), trailing bursts
/// before the 1500ms completion.
#[test]
fn test_high_tier_from_centered_element() {
    let (mut engine, clock) = engine(2);
    engine.set_viewport(Viewport::new(1920.0, 1080.0));
    let banner = Arc::new(Rect::new(860.0, 490.0, 200.0, 100.0));

    let (done, on_complete) = counter();
    engine.start(
        StartOptions::new(IntensityTier::High)
            .with_origin(OriginHint::element(&banner))
            .on_complete(on_complete),
    );

    let origin = engine.origin().unwrap();
    assert!((origin.x - 50.0).abs() < 1e-3 && (origin.y - 50.0).abs() < 1e-3);

    let first_trailing = engine.next_deadline_ms().unwrap() - 10_000;
    assert!(first_trailing < 1_500);

    clock.set_ms(10_000 + 1_499);
    engine.update();
    assert_eq!(engine.waves().len(), 4);
    assert_eq!(done.load(Ordering::SeqCst), 0);

    clock.set_ms(10_000 + 1_500);
    engine.update();
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

/// Re-triggering mid-session: one callback overall, no stale timers.
#[test]
fn test_retrigger_clears_superseded_timers() {
    let (mut engine, clock) = engine(3);
    let (done, on_complete) = counter();
    let first = engine.start(StartOptions::new(IntensityTier::High).on_complete(on_complete));

    clock.set_ms(10_000 + 100);
    let second = engine.start(StartOptions::new(IntensityTier::High));

    // Walk through the old session's deadlines: only the new one's fire.
    for ms in (100..=1_700).step_by(10) {
        clock.set_ms(10_000 + ms);
        engine.update();
        assert!(engine
            .waves()
            .iter()
            .all(|wave| wave.id.session != first));
        if ms < 1_600 {
            assert_eq!(engine.session_id(), Some(second), "ended early at {ms}ms");
        }
    }

    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert!(!engine.is_active());
}

/// Two back-to-back starts look exactly like one.
#[test]
fn test_double_start_matches_single_start() {
    let (mut doubled, doubled_clock) = engine(4);
    let (mut single, single_clock) = engine(4);
    let (doubled_done, doubled_cb) = counter();
    let (single_done, single_cb) = counter();

    doubled.start(StartOptions::new(IntensityTier::Medium).on_complete(doubled_cb));
    doubled.start(StartOptions::new(IntensityTier::Medium));
    single.start(StartOptions::new(IntensityTier::Medium).on_complete(single_cb));

    assert_eq!(doubled.pending_timers(), single.pending_timers());
    assert_eq!(doubled.next_deadline_ms(), single.next_deadline_ms());
    assert_eq!(doubled.waves().len(), single.waves().len());
    assert_eq!(
        doubled.animations().len(),
        single.animations().len()
    );

    doubled_clock.set_ms(20_000);
    single_clock.set_ms(20_000);
    doubled.update();
    single.update();
    assert_eq!(doubled_done.load(Ordering::SeqCst), 1);
    assert_eq!(single_done.load(Ordering::SeqCst), 1);
}

/// Every particle is gone before the completion timer fires.
#[test]
fn test_no_particle_outlives_session() {
    for tier in IntensityTier::ALL {
        let (mut engine, clock) = engine(5);
        engine.start(StartOptions::new(tier));
        let total = IntensityProfile::reference(tier).total_duration_ms;

        clock.set_ms(10_000 + u64::from(total) - 1);
        engine.update();
        for spec in engine.animations() {
            assert!(spec.animation.end_ms() <= total, "{tier}: {}", spec.animation.end_ms());
        }
    }
}

/// A host without keyframe support can sample the live animations.
#[test]
fn test_sampled_frames_follow_session() {
    let (mut engine, clock) = engine(6);
    let viewport = Viewport::new(800.0, 600.0);
    engine.set_viewport(viewport);
    engine.start(StartOptions::new(IntensityTier::Low).with_origin(OriginHint::Point(Vec2::new(50.0, 50.0))));

    let mut sampler = KeyframeSampler::default();
    assert!(sampler.sample(0.0, &engine.animations(), viewport));
    // Every initial particle is on screen at spawn (30 confetti + 12 sparkles)
    assert_eq!(sampler.commands().len(), 42);

    clock.set_ms(10_000 + 850);
    engine.update();
    assert!(engine.animations().is_empty());
}

/// Replaced profiles apply from the next start.
#[test]
fn test_profile_table_swap() {
    let (mut engine, _clock) = engine(7);
    let mut table = ProfileTable::reference();
    let mut quiet = IntensityProfile::LOW;
    quiet.particle_count = 10;
    table.set(IntensityTier::Low, quiet).unwrap();

    let mut broken = IntensityProfile::MEDIUM;
    broken.lifespan_ms.max = 5_000;
    assert!(table.set(IntensityTier::Medium, broken).is_err());

    engine.set_profiles(table).unwrap();
    engine.start(StartOptions::new(IntensityTier::Low));
    assert_eq!(engine.waves()[0].pieces.len(), 10);
    assert_eq!(engine.profiles().get(IntensityTier::Medium), &IntensityProfile::MEDIUM);
}
