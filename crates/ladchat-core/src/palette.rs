//! Fixed color palette for captions and drawing strokes.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for Rgba8 {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba8> for Color {
    fn from(color: Rgba8) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Colors offered by the caption and drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteColor {
    #[default]
    White,
    Black,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl PaletteColor {
    /// Get all palette entries in toolbar order.
    pub fn all() -> &'static [PaletteColor] {
        &[
            PaletteColor::White,
            PaletteColor::Black,
            PaletteColor::Red,
            PaletteColor::Orange,
            PaletteColor::Yellow,
            PaletteColor::Green,
            PaletteColor::Blue,
            PaletteColor::Purple,
            PaletteColor::Pink,
        ]
    }

    pub fn rgba(self) -> Rgba8 {
        match self {
            PaletteColor::White => Rgba8::opaque(0xFF, 0xFF, 0xFF),
            PaletteColor::Black => Rgba8::opaque(0x00, 0x00, 0x00),
            PaletteColor::Red => Rgba8::opaque(0xFF, 0x3B, 0x30),
            PaletteColor::Orange => Rgba8::opaque(0xFF, 0x95, 0x00),
            PaletteColor::Yellow => Rgba8::opaque(0xFF, 0xCC, 0x00),
            PaletteColor::Green => Rgba8::opaque(0x34, 0xC7, 0x59),
            PaletteColor::Blue => Rgba8::opaque(0x00, 0x7A, 0xFF),
            PaletteColor::Purple => Rgba8::opaque(0xAF, 0x52, 0xDE),
            PaletteColor::Pink => Rgba8::opaque(0xFF, 0x2D, 0x55),
        }
    }

    /// Get the palette entry as a peniko Color.
    pub fn color(self) -> Color {
        self.rgba().into()
    }

    /// Get display name for UI.
    pub fn display_name(self) -> &'static str {
        match self {
            PaletteColor::White => "White",
            PaletteColor::Black => "Black",
            PaletteColor::Red => "Red",
            PaletteColor::Orange => "Orange",
            PaletteColor::Yellow => "Yellow",
            PaletteColor::Green => "Green",
            PaletteColor::Blue => "Blue",
            PaletteColor::Purple => "Purple",
            PaletteColor::Pink => "Pink",
        }
    }

    /// Look up a palette entry by (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.display_name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Translucent box drawn behind captions that have the background flag set.
pub const CAPTION_BACKGROUND: Rgba8 = Rgba8::new(0, 0, 0, 128);
