//! Engine-neutral color values.

use serde::{Deserialize, Serialize};

/// Linear RGBA color. Components are unclamped `f32`s; hosts convert to
/// whatever their renderer wants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Rgba = Rgba::new(0.9, 0.15, 0.15, 1.0);
    pub const GREEN: Rgba = Rgba::new(0.2, 0.8, 0.25, 1.0);
    pub const BLUE: Rgba = Rgba::new(0.2, 0.4, 0.95, 1.0);
    pub const YELLOW: Rgba = Rgba::new(0.95, 0.85, 0.2, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// All four components are finite (no NaN/infinity).
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl Default for Rgba {
    fn default() -> Rgba {
        Rgba::WHITE
    }
}
