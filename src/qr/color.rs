//! Module and background colours

use crate::error::{Error, Result};
use image::{Luma, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB colour used to paint modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QrColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

const NAMED: &[(&str, QrColor)] = &[
    ("black", QrColor::BLACK),
    ("white", QrColor::WHITE),
    ("red", QrColor::rgb(0xff, 0x00, 0x00)),
    ("green", QrColor::rgb(0x00, 0x80, 0x00)),
    ("blue", QrColor::rgb(0x00, 0x00, 0xff)),
    ("yellow", QrColor::rgb(0xff, 0xff, 0x00)),
    ("orange", QrColor::rgb(0xff, 0xa5, 0x00)),
    ("purple", QrColor::rgb(0x80, 0x00, 0x80)),
    ("navy", QrColor::rgb(0x00, 0x00, 0x80)),
    ("gray", QrColor::rgb(0x80, 0x80, 0x80)),
    ("grey", QrColor::rgb(0x80, 0x80, 0x80)),
    ("silver", QrColor::rgb(0xc0, 0xc0, 0xc0)),
    ("maroon", QrColor::rgb(0x80, 0x00, 0x00)),
    ("teal", QrColor::rgb(0x00, 0x80, 0x80)),
];

impl QrColor {
    /// Pure black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Pure white
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Build a colour from its channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a colour name or `#rgb` / `#rrggbb` hex string.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| Error::InvalidColor(value.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(|| Error::InvalidColor(value.to_string()))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
                Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => None,
        }
    }

    /// Whether all three channels are equal
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// RGB pixel value
    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }

    /// Luminance pixel value, exact for grey colours
    pub fn to_luma(self) -> Luma<u8> {
        let y = (299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b)) / 1000;
        Luma([y as u8])
    }
}

impl FromStr for QrColor {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for QrColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<QrColor> for String {
    fn from(color: QrColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for QrColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(QrColor::parse("black").unwrap(), QrColor::BLACK);
        assert_eq!(QrColor::parse(" White ").unwrap(), QrColor::WHITE);
        assert_eq!(QrColor::parse("GREY").unwrap(), QrColor::parse("gray").unwrap());
    }

    #[test]
    fn parses_hex_forms() {
        assert_eq!(QrColor::parse("#1a2B3c").unwrap(), QrColor::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(QrColor::parse("#fa0").unwrap(), QrColor::rgb(0xff, 0xaa, 0x00));
    }

    #[test]
    fn rejects_unknown_colours() {
        for bad in ["", "#", "#12345", "#gggggg", "chartreuse", "#ＡＡＡ"] {
            assert!(
                matches!(QrColor::parse(bad), Err(Error::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(QrColor::parse("navy").unwrap().to_string(), "#000080");
    }

    #[test]
    fn grey_colours_map_to_exact_luma() {
        assert!(QrColor::BLACK.is_gray());
        assert_eq!(QrColor::WHITE.to_luma(), Luma([255]));
        assert_eq!(QrColor::rgb(0x80, 0x80, 0x80).to_luma(), Luma([0x80]));
        assert!(!QrColor::rgb(1, 2, 3).is_gray());
    }

    #[test]
    fn serde_uses_strings() {
        #[derive(Deserialize)]
        struct Wrapper {
            color: QrColor,
        }
        let parsed: Wrapper = toml::from_str("color = \"#ff0000\"").unwrap();
        assert_eq!(parsed.color, QrColor::rgb(0xff, 0, 0));
        assert_eq!(serde_json::to_string(&QrColor::WHITE).unwrap(), "\"#ffffff\"");
    }
}
