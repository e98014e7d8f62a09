//! # FANFARE Shared
//!
//! Common types used by the engine, the UI layer and host integrations.
//!
//! ## Units
//!
//! Every position in FANFARE is expressed in **percent of the viewport**:
//! `(0, 0)` is the top-left corner, `(100, 100)` the bottom-right one, and
//! `y` grows downward. Velocities, gravity and particle sizes use the same
//! unit so trajectories stay resolution independent.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    DEFAULT_ORIGIN, DEFAULT_SPARKLE_COUNT, FALL_FACTOR, FAR_DEPTH_PROBABILITY, SPIN_FACTOR,
};
pub use math::Vec2;
