//! # FANFARE UI Layer
//!
//! Declarative animation contract between the celebration engine and a host
//! renderer:
//! - Start/end keyframes per particle, interpolated by the host
//! - Fixed multi-stop fade curves timed to each particle's own lifespan
//! - A sampling adapter for hosts without native keyframe interpolation
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                   RENDER CONTRACT                       │
//! ├────────────────────────────────────────────────────────┤
//! │  ParticleSpec → ParticleAnimation → KeyframeSampler    │
//! │       ↓               ↓                   ↓            │
//! │  Visual (shape)   sample(t_ms)     RenderCommand/GPU    │
//! └────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod layout;
pub mod render;
pub mod style;

pub use animation::{Easing, FadeCurve, FadeStop, KeyframeState, ParticleAnimation};
pub use layout::{Anchor, Rect, Viewport};
pub use render::{
    KeyframeSampler, ParticleInstance, ParticleShape, ParticleSpec, ParticleVisual,
    RenderCommand, RenderKey, VisualKind,
};
pub use style::{Color, Depth, LayerStyle, CONFETTI_PALETTE, SPARKLE_GLOW};
