//! Benchmark for burst generation.
//!
//! TARGET: a `high` initial wave (100 confetti + 12 sparkles) well under
//! one 60 Hz frame, including its render specs.
//!
//! Run with: cargo bench --package fanfare_effects --bench trajectory_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fanfare_effects::{
    render_contract, BurstParams, ConfettiEngine, EmissionScheduler, IdAllocator,
    IntensityProfile, IntensityTier, ManualClock, SessionId, StartOptions, TrajectoryGenerator,
    WaveId,
};
use fanfare_shared::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn benchmark_confetti(c: &mut Criterion) {
    let mut group = c.benchmark_group("confetti");
    let origin = Vec2::new(50.0, 40.0);
    let wave = WaveId {
        session: SessionId(1),
        index: 0,
    };

    for (name, profile) in [
        ("low", IntensityProfile::LOW),
        ("medium", IntensityProfile::MEDIUM),
        ("high", IntensityProfile::HIGH),
    ] {
        let params = BurstParams::initial(&profile);
        group.throughput(Throughput::Elements(u64::from(profile.particle_count)));
        group.bench_function(name, |b| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            let mut ids = IdAllocator::new();
            b.iter(|| {
                black_box(TrajectoryGenerator::confetti(
                    &mut rng,
                    black_box(&params),
                    origin,
                    profile.particle_count,
                    wave,
                    &mut ids,
                ))
            });
        });
    }

    group.finish();
}

fn benchmark_wave_specs(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut ids = IdAllocator::new();
    let wave = EmissionScheduler::initial_wave(
        &mut rng,
        &IntensityProfile::HIGH,
        Vec2::new(50.0, 40.0),
        12,
        SessionId(1),
        &mut ids,
    );

    c.bench_function("high_wave_specs", |b| {
        b.iter(|| black_box(render_contract::wave_specs(black_box(&wave))));
    });
}

fn benchmark_session(c: &mut Criterion) {
    c.bench_function("high_session_lifecycle", |b| {
        let clock = ManualClock::new(0);
        let mut engine = ConfettiEngine::with_clock(clock.clone()).with_seed(7);
        let mut now = 0;
        b.iter(|| {
            engine.start(StartOptions::new(IntensityTier::High));
            now += 1_500;
            clock.set_ms(now);
            black_box(engine.update())
        });
    });
}

criterion_group!(
    benches,
    benchmark_confetti,
    benchmark_wave_specs,
    benchmark_session
);
criterion_main!(benches);
