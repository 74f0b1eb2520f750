use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Identifier for a [`crate::particle::Particle`].
///
/// Assigned in creation order and stable for the lifetime of the owning
/// [`crate::particle::ParticleSet`].
pub type ParticleId = usize;

/// Identifier for a node in a [`crate::network::Network`].
///
/// This is an index into `Network::nodes`, and is only meaningful within
/// the lifetime of a given `Network` instance.
pub type NodeId = usize;

/// Index into `Network::edges`.
pub type EdgeId = usize;

/// Drawable surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn contains(&self, p: glam::Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Color token carried by entities and draw commands.
///
/// Channels are 8-bit; alpha is a `[0, 1]` factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same color with alpha replaced (clamped to `[0, 1]`).
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parses a `#rrggbb` token.
    pub fn from_hex(token: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(token.to_owned());
        let hex = token.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_parses_lowercase_and_uppercase() {
        assert_eq!(Rgba::from_hex("#5eead4").unwrap(), Rgba::opaque(0x5e, 0xea, 0xd4));
        assert_eq!(Rgba::from_hex("#0EA5E9").unwrap(), Rgba::opaque(0x0e, 0xa5, 0xe9));
    }

    #[test]
    fn from_hex_rejects_malformed_tokens() {
        for bad in ["5eead4", "#5eea", "#zzzzzz", "#5eead4ff", "#ééé"] {
            assert!(
                matches!(Rgba::from_hex(bad), Err(ConfigError::InvalidColor(_))),
                "token {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn with_alpha_clamps() {
        let c = Rgba::opaque(1, 2, 3);
        assert_eq!(c.with_alpha(2.0).a, 1.0);
        assert_eq!(c.with_alpha(-1.0).a, 0.0);
    }

    #[test]
    fn viewport_contains_is_inclusive_on_edges() {
        let vp = Viewport::new(100.0, 50.0);
        assert!(vp.contains(glam::Vec2::new(0.0, 0.0)));
        assert!(vp.contains(glam::Vec2::new(100.0, 50.0)));
        assert!(!vp.contains(glam::Vec2::new(100.1, 10.0)));
    }
}
