//! Screen-space geometry for origin resolution.

use fanfare_shared::Vec2;
use serde::{Deserialize, Serialize};

/// A rectangle in screen coordinates (pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns the middle of the top edge.
    #[must_use]
    pub fn top_center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y)
    }

    /// Returns the point selected by `anchor`.
    #[must_use]
    pub fn anchor_point(&self, anchor: Anchor) -> (f32, f32) {
        match anchor {
            Anchor::Center => self.center(),
            Anchor::TopCenter => self.top_center(),
        }
    }

    /// Returns true if every field is finite and the size is non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Which point of a trigger element the burst emanates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Center of the bounding box.
    #[default]
    Center,
    /// Middle of the top edge (bursts "out of" a button or badge).
    TopCenter,
}

/// The host's drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns true if the viewport can map pixels to percentages.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Converts a pixel point to viewport percent.
    ///
    /// Returns `None` for a degenerate viewport or a non-finite result.
    #[must_use]
    pub fn to_percent(&self, x: f32, y: f32) -> Option<Vec2> {
        if !self.is_valid() {
            return None;
        }
        let point = Vec2::new(x / self.width * 100.0, y / self.height * 100.0);
        point.is_finite().then_some(point)
    }

    /// Converts a viewport-percent point to pixels.
    #[must_use]
    pub fn to_pixels(&self, point: Vec2) -> (f32, f32) {
        (point.x / 100.0 * self.width, point.y / 100.0 * self.height)
    }

    /// Converts a viewport-percent length to pixels (relative to the shorter side).
    #[must_use]
    pub fn length_to_pixels(&self, length: f32) -> f32 {
        length / 100.0 * self.width.min(self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_points() {
        let rect = Rect::new(100.0, 200.0, 50.0, 20.0);
        assert_eq!(rect.anchor_point(Anchor::Center), (125.0, 210.0));
        assert_eq!(rect.anchor_point(Anchor::TopCenter), (125.0, 200.0));
    }

    #[test]
    fn test_viewport_percent_round_trip() {
        let viewport = Viewport::new(800.0, 600.0);
        let point = viewport.to_percent(400.0, 150.0).unwrap();
        assert_eq!(point, Vec2::new(50.0, 25.0));
        assert_eq!(viewport.to_pixels(point), (400.0, 150.0));
    }

    #[test]
    fn test_degenerate_viewport_has_no_percent() {
        assert!(Viewport::new(0.0, 600.0).to_percent(1.0, 1.0).is_none());
        assert!(Viewport::new(f32::NAN, 600.0).to_percent(1.0, 1.0).is_none());
        assert!(Viewport::new(800.0, 600.0)
            .to_percent(f32::INFINITY, 1.0)
            .is_none());
    }

    #[test]
    fn test_invalid_rect() {
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, -1.0, 10.0).is_valid());
        assert!(!Rect::new(f32::NAN, 0.0, 10.0, 10.0).is_valid());
    }
}
