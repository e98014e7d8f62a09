//! # FANFARE Celebrate
//!
//! Headless demo: runs one celebration through the full host pipeline
//! (bus → loop → engine → sampler) at 60 FPS and logs what happens.
//!
//! ```bash
//! # Default medium burst
//! celebrate
//!
//! # Pick a tier and a config file
//! RUST_LOG=debug celebrate high fanfare.toml
//! ```

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use fanfare::{Celebration, CelebrationLoop, CelebrationRequest};
use fanfare_effects::{EngineConfig, IntensityTier};

/// Frame budget for 60 FPS.
const FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Hard stop in case the loop never goes idle.
const MAX_FRAMES: u64 = 600;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let tier = args
        .next()
        .map_or(IntensityTier::default(), |name| IntensityTier::from_name(&name));

    let config = match args.next() {
        Some(path) => match EngineConfig::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let mut game_loop = match CelebrationLoop::from_config(&config) {
        Ok(game_loop) => game_loop,
        Err(e) => {
            tracing::error!("Invalid engine config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    FANFARE CELEBRATE v{}", env!("CARGO_PKG_VERSION"));
    println!("═══════════════════════════════════════════════════════════════════");
    println!();
    println!("  Tier:      {tier}");
    println!("  Viewport:  {}x{}", config.viewport.width, config.viewport.height);
    println!("  Sample:    {} Hz", config.sample_rate_hz);
    println!();

    let request = CelebrationRequest::new(Celebration::LevelUp { level: 1 }).with_tier(tier);
    if !game_loop.sender().send(request) {
        tracing::error!("Celebration bus rejected the request");
        return ExitCode::FAILURE;
    }

    let start = Instant::now();
    let mut peak_particles = 0;
    loop {
        let frame_start = Instant::now();
        let report = game_loop.frame();
        peak_particles = peak_particles.max(report.particles_drawn);

        if report.timers_fired > 0 {
            tracing::info!(
                "Frame {}: {} timer(s) fired, {} particles on screen",
                report.frame,
                report.timers_fired,
                report.particles_drawn
            );
        }

        if report.frame > 0 && !game_loop.engine().is_active() {
            break;
        }
        if report.frame >= MAX_FRAMES {
            tracing::warn!("Celebration still running after {} frames, cancelling", MAX_FRAMES);
            game_loop.engine_mut().cancel();
            break;
        }

        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    println!();
    println!("┌─ SUMMARY ──────────────────────────────────────────────────────┐");
    println!("│ Frames:           {}", game_loop.frame_count());
    println!("│ Wall time:        {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);
    println!("│ Peak particles:   {peak_particles}");
    println!("│ Completions:      {}", game_loop.completed());
    println!("└──────────────────────────────────────────────────────────────────┘");

    ExitCode::SUCCESS
}
