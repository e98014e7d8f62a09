//! # Origin Resolver
//!
//! Picks the screen point a burst emanates from. Trigger elements are held
//! weakly and measured once, when the session starts; every failure path
//! degrades to the default origin instead of erroring.

use std::fmt;
use std::sync::{Arc, Weak};

use fanfare_shared::constants::{DEFAULT_ORIGIN, VIEWPORT_MAX, VIEWPORT_MIN};
use fanfare_shared::Vec2;
use fanfare_ui::{Anchor, Rect, Viewport};

/// Something on screen that can trigger a celebration.
pub trait TriggerElement: Send + Sync {
    /// Current bounding box in viewport pixels, `None` if detached.
    fn bounding_rect(&self) -> Option<Rect>;
}

impl TriggerElement for Rect {
    fn bounding_rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

/// Where the caller would like the burst to start.
#[derive(Clone)]
pub enum OriginHint {
    /// Anchor point of a live element.
    Element {
        /// The element, held weakly.
        element: Weak<dyn TriggerElement>,
        /// Which point of its bounding box to use.
        anchor: Anchor,
    },
    /// Explicit point in viewport percent.
    Point(Vec2),
    /// Explicit point in viewport pixels.
    Pixel {
        /// X in pixels.
        x: f32,
        /// Y in pixels.
        y: f32,
    },
}

impl OriginHint {
    /// Center of `element`.
    pub fn element<E: TriggerElement + 'static>(element: &Arc<E>) -> Self {
        Self::element_anchored(element, Anchor::Center)
    }

    /// `anchor` point of `element`.
    pub fn element_anchored<E: TriggerElement + 'static>(element: &Arc<E>, anchor: Anchor) -> Self {
        let element: Arc<dyn TriggerElement> = element.clone();
        Self::Element {
            element: Arc::downgrade(&element),
            anchor,
        }
    }
}

impl fmt::Debug for OriginHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element { element, anchor } => f
                .debug_struct("Element")
                .field("alive", &(element.strong_count() > 0))
                .field("anchor", anchor)
                .finish(),
            Self::Point(point) => f.debug_tuple("Point").field(point).finish(),
            Self::Pixel { x, y } => f.debug_struct("Pixel").field("x", x).field("y", y).finish(),
        }
    }
}

/// Converts origin hints into viewport-percent coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginResolver {
    viewport: Viewport,
    default_origin: Vec2,
}

impl OriginResolver {
    /// Creates a resolver for `viewport`.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            default_origin: DEFAULT_ORIGIN,
        }
    }

    /// Overrides the fallback origin (clamped into the viewport).
    #[must_use]
    pub fn with_default_origin(mut self, origin: Vec2) -> Self {
        self.default_origin = if origin.is_finite() {
            origin.clamp(VIEWPORT_MIN, VIEWPORT_MAX)
        } else {
            DEFAULT_ORIGIN
        };
        self
    }

    /// Updates the viewport (call on resize).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fallback origin.
    #[must_use]
    pub const fn default_origin(&self) -> Vec2 {
        self.default_origin
    }

    /// Resolves `hint`, falling back to the default origin on any failure.
    #[must_use]
    pub fn resolve(&self, hint: Option<&OriginHint>) -> Vec2 {
        let Some(hint) = hint else {
            return self.default_origin;
        };

        let resolved = match hint {
            OriginHint::Point(point) => Some(*point),
            OriginHint::Pixel { x, y } => self.viewport.to_percent(*x, *y),
            OriginHint::Element { element, anchor } => self.resolve_element(element, *anchor),
        };

        match resolved {
            Some(point) if point.is_finite() => point.clamp(VIEWPORT_MIN, VIEWPORT_MAX),
            _ => {
                tracing::warn!(?hint, "Origin hint unusable, using default origin");
                self.default_origin
            }
        }
    }

    fn resolve_element(&self, element: &Weak<dyn TriggerElement>, anchor: Anchor) -> Option<Vec2> {
        let element = element.upgrade()?;
        let rect = element.bounding_rect().filter(Rect::is_valid)?;
        let (x, y) = rect.anchor_point(anchor);
        self.viewport.to_percent(x, y)
    }
}

impl Default for OriginResolver {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
