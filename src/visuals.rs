//! Colors used by the star field and the orbital scene.
//!
//! Colors are stored as 8-bit sRGB and serialize as `#RRGGBB` strings so
//! scene configs stay readable:
//!
//! ```ignore
//! let indigo = Color::from_hex("#818CF8")?;
//! canvas.fill_circle(center, 1.5, indigo, 0.8);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    /// Page background (`#09090B`).
    pub const SPACE: Color = Color::rgb(0x09, 0x09, 0x0B);
    /// Accent used for tinted stars and highlights (`#818CF8`).
    pub const INDIGO: Color = Color::rgb(0x81, 0x8C, 0xF8);
    /// Thruster flame (`#60A5FA`).
    pub const FLAME: Color = Color::rgb(0x60, 0xA5, 0xFA);
    /// Satellite bus (`#27272A`).
    pub const HULL: Color = Color::rgb(0x27, 0x27, 0x2A);
    /// Gold foil insulation (`#D4AF37`).
    pub const FOIL: Color = Color::rgb(0xD4, 0xAF, 0x37);
    /// Solar panels (`#1E3A8A`).
    pub const PANEL: Color = Color::rgb(0x1E, 0x3A, 0x8A);

    /// Asteroid rock (`#2D3748`).
    pub const ROCK: Color = Color::rgb(0x2D, 0x37, 0x48);
    /// Lit asteroid edge (`#4A5568`).
    pub const ROCK_EDGE: Color = Color::rgb(0x4A, 0x55, 0x68);
    /// Planet oceans (`#1E3A8A`).
    pub const OCEAN: Color = Color::rgb(0x1E, 0x3A, 0x8A);
    /// Planet land (`#065F46`).
    pub const LAND: Color = Color::rgb(0x06, 0x5F, 0x46);
    /// Outer atmosphere glow (`#3B82F6`).
    pub const ATMOSPHERE: Color = Color::rgb(0x3B, 0x82, 0xF6);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channels as linear-ish floats in [0, 1] (no gamma conversion).
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Color {
    /// Inverse of [`Color::to_f32`]; channels are clamped to [0, 1].
    pub fn from_f32([r, g, b]: [f32; 3]) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid color '{}', expected #RRGGBB", s))
    }
}

/// Color tag carried by each star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StarColor {
    #[default]
    White,
    Indigo,
}

impl StarColor {
    pub fn color(self) -> Color {
        match self {
            StarColor::White => Color::WHITE,
            StarColor::Indigo => Color::INDIGO,
        }
    }
}
