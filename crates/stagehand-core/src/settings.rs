//! Spawn defaults handed to the service at construction.
//!
//! The host owns loading and persistence (see the settings crate); this
//! module defines the validated value object and the spawn-kind vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::host::PrimitiveShape;
use crate::rng::SpawnRng;

/// Which primitive a spawn request should produce. `Random` defers the
/// choice to the service's RNG at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnKind {
    Cube,
    Sphere,
    Random,
}

impl SpawnKind {
    /// Case-insensitive parse of the settings-file spelling.
    pub fn parse(raw: &str) -> Option<SpawnKind> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cube" => Some(SpawnKind::Cube),
            "sphere" => Some(SpawnKind::Sphere),
            "random" => Some(SpawnKind::Random),
            _ => None,
        }
    }

    /// Resolve to a concrete primitive, rolling the RNG for `Random`.
    pub fn resolve(self, rng: &mut SpawnRng) -> PrimitiveShape {
        match self {
            SpawnKind::Cube => PrimitiveShape::Cube,
            SpawnKind::Sphere => PrimitiveShape::Sphere,
            SpawnKind::Random => {
                if rng.coin() {
                    PrimitiveShape::Cube
                } else {
                    PrimitiveShape::Sphere
                }
            }
        }
    }
}

impl fmt::Display for SpawnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpawnKind::Cube => "cube",
            SpawnKind::Sphere => "sphere",
            SpawnKind::Random => "random",
        };
        write!(f, "{name}")
    }
}

/// Defaults applied to newly spawned objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectDefaults {
    pub spawn_kind: SpawnKind,
    pub color: Rgba,
    pub scale: f32,
}

impl Default for ObjectDefaults {
    fn default() -> ObjectDefaults {
        ObjectDefaults {
            spawn_kind: SpawnKind::Cube,
            color: Rgba::WHITE,
            scale: 1.0,
        }
    }
}

impl ObjectDefaults {
    /// The scale must be finite and strictly positive; color components
    /// must be finite.
    pub fn is_valid(&self) -> bool {
        self.color.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }

    /// Reset invalid fields to their defaults, leaving valid ones alone.
    pub fn apply_safe_defaults(&mut self) {
        if !self.color.is_finite() {
            self.color = Rgba::WHITE;
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            self.scale = 1.0;
        }
    }

    /// By-value form of [`ObjectDefaults::apply_safe_defaults`].
    pub fn sanitized(mut self) -> ObjectDefaults {
        self.apply_safe_defaults();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(SpawnKind::parse("Cube"), Some(SpawnKind::Cube));
        assert_eq!(SpawnKind::parse("SPHERE"), Some(SpawnKind::Sphere));
        assert_eq!(SpawnKind::parse("  random "), Some(SpawnKind::Random));
        assert_eq!(SpawnKind::parse("cylinder"), None);
        assert_eq!(SpawnKind::parse(""), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in [SpawnKind::Cube, SpawnKind::Sphere, SpawnKind::Random] {
            assert_eq!(SpawnKind::parse(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn fixed_kinds_resolve_without_touching_rng() {
        let mut rng = SpawnRng::new(7);
        let before = rng.state();
        assert_eq!(SpawnKind::Cube.resolve(&mut rng), PrimitiveShape::Cube);
        assert_eq!(SpawnKind::Sphere.resolve(&mut rng), PrimitiveShape::Sphere);
        assert_eq!(rng.state(), before);
    }

    #[test]
    fn random_resolution_is_seed_deterministic() {
        let mut a = SpawnRng::new(99);
        let mut b = SpawnRng::new(99);
        for _ in 0..32 {
            assert_eq!(
                SpawnKind::Random.resolve(&mut a),
                SpawnKind::Random.resolve(&mut b)
            );
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(ObjectDefaults::default().is_valid());
    }

    #[test]
    fn safe_defaults_fix_only_broken_fields() {
        let mut defaults = ObjectDefaults {
            spawn_kind: SpawnKind::Sphere,
            color: Rgba::new(0.1, 0.2, 0.3, 1.0),
            scale: -2.0,
        };
        defaults.apply_safe_defaults();
        assert_eq!(defaults.spawn_kind, SpawnKind::Sphere);
        assert_eq!(defaults.color, Rgba::new(0.1, 0.2, 0.3, 1.0));
        assert_eq!(defaults.scale, 1.0);

        let broken_color = ObjectDefaults {
            spawn_kind: SpawnKind::Random,
            color: Rgba::new(f32::NAN, 0.0, 0.0, 1.0),
            scale: 0.5,
        }
        .sanitized();
        assert_eq!(broken_color.color, Rgba::WHITE);
        assert_eq!(broken_color.scale, 0.5);
    }

    #[test]
    fn zero_and_nan_scales_are_invalid() {
        let mut defaults = ObjectDefaults::default();
        defaults.scale = 0.0;
        assert!(!defaults.is_valid());
        defaults.scale = f32::NAN;
        assert!(!defaults.is_valid());
        defaults.scale = f32::INFINITY;
        assert!(!defaults.is_valid());
    }
}
