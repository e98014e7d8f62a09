//! # FANFARE
//!
//! Host integration for the celebration engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              FANFARE                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  UI surfaces ──> EventBus ──> CelebrationLoop ──> KeyframeSampler       │
//! │  (level-up,                        │                    │               │
//! │   streaks,                         ▼                    ▼               │
//! │   alliance)                 ConfettiEngine        RenderCommand /       │
//! │                              (one per host)       ParticleInstance      │
//! │                                    ▲                                    │
//! │                  driver::run_until_idle (tokio, no frame loop)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `events`: celebration requests and the crossbeam bus
//! - `game_loop`: frame orchestration and sampling
//! - `driver`: async ticker for a shared engine

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod driver;
pub mod events;
pub mod game_loop;

// Re-export the building blocks
pub use fanfare_effects as effects;
pub use fanfare_shared as shared;
pub use fanfare_ui as ui;

// Re-export commonly used types
pub use driver::{DriverStats, SharedEngine, TokioClock};
pub use events::{Celebration, CelebrationRequest, EventBus, EventReceiver, EventSender};
pub use game_loop::{CelebrationLoop, FrameReport, LoopConfig};
