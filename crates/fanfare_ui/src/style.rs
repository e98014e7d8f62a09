//! Colors and layer styling for celebration particles.

use fanfare_shared::constants::{FAR_BLUR_PX, FAR_OPACITY, FAR_SCALE};
use serde::{Deserialize, Serialize};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from hex value (0xRRGGBBAA).
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Returns the color with its alpha multiplied by `factor`.
    #[must_use]
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor.clamp(0.0, 1.0))
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Fixed confetti palette. Pieces draw uniformly from it.
pub const CONFETTI_PALETTE: [Color; 8] = [
    Color::hex(0xFF_4D_6D_FF), // Rose
    Color::hex(0xFF_B3_30_FF), // Amber
    Color::hex(0xFF_E0_4A_FF), // Lemon
    Color::hex(0x4C_D9_7B_FF), // Mint
    Color::hex(0x38_BD_F8_FF), // Sky
    Color::hex(0x81_8C_F8_FF), // Indigo
    Color::hex(0xC0_84_FC_FF), // Lilac
    Color::hex(0xF4_72_B6_FF), // Pink
];

/// Sparkle glow color (colorless, slightly warm white).
pub const SPARKLE_GLOW: Color = Color::rgba(1.0, 0.98, 0.92, 0.95);

/// Parallax layer of a confetti piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Foreground layer, drawn as-is.
    #[default]
    Near,
    /// Background layer: smaller, dimmer, blurred.
    Far,
}

impl Depth {
    /// Layer styling for this depth.
    #[must_use]
    pub const fn layer_style(self) -> LayerStyle {
        match self {
            Self::Near => LayerStyle::NEAR,
            Self::Far => LayerStyle::FAR,
        }
    }
}

/// Static styling multipliers applied on top of keyframe values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// Scale multiplier.
    pub scale: f32,
    /// Opacity multiplier.
    pub opacity: f32,
    /// Blur radius in pixels.
    pub blur_px: f32,
}

impl LayerStyle {
    /// Foreground styling.
    pub const NEAR: Self = Self {
        scale: 1.0,
        opacity: 1.0,
        blur_px: 0.0,
    };

    /// Background styling.
    pub const FAR: Self = Self {
        scale: FAR_SCALE,
        opacity: FAR_OPACITY,
        blur_px: FAR_BLUR_PX,
    };
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::NEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let color = Color::hex(0xFF00_00FF);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!(color.g.abs() < 0.01);
        assert!(color.b.abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_hex_evaluates_in_const_context() {
        const ROSE: Color = Color::hex(0xFF_4D_6D_FF);
        assert_eq!(CONFETTI_PALETTE[0], ROSE);
        assert!((ROSE.g - 77.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_palette_is_opaque_and_distinct() {
        for (i, a) in CONFETTI_PALETTE.iter().enumerate() {
            assert!((a.a - 1.0).abs() < f32::EPSILON);
            for b in &CONFETTI_PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_far_layer_is_smaller_dimmer_blurred() {
        let far = Depth::Far.layer_style();
        let near = Depth::Near.layer_style();
        assert!(far.scale < near.scale);
        assert!(far.opacity < near.opacity);
        assert!(far.blur_px > near.blur_px);
    }

    #[test]
    fn test_fade_multiplies_alpha() {
        let faded = Color::WHITE.fade(0.5);
        assert!((faded.a - 0.5).abs() < 1e-6);
        assert_eq!(faded.r, 1.0);
    }
}
