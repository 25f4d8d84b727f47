//! QR code encoding, rendering and decoding
//!
//! Symbol construction is delegated to the `qrcode` crate and read-back to
//! `rqrr`; this module only chooses the symbol version, paints modules onto
//! a raster and checks that the result scans.

mod color;
mod decoder;
mod encoder;
mod render;

pub use color::QrColor;
pub use decoder::QrDecoder;
pub use encoder::{QrEncoder, QrSymbol};
pub use render::RenderStyle;

use crate::error::{Error, Result};
use qrcode::EcLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest QR symbol version defined by the standard
pub const MAX_VERSION: i16 = 40;

/// Smallest quiet zone, in modules, a scanner can rely on
pub const MIN_BORDER: u32 = 4;

/// A QR code payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// The raw data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from a string
    pub fn from_string(s: String) -> Self {
        Self {
            data: s.as_bytes().to_vec(),
            text: Some(s),
        }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload carries no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Error correction level of the generated symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// ~7% of codewords recoverable
    Low,
    /// ~15% of codewords recoverable
    #[default]
    Medium,
    /// ~25% of codewords recoverable
    Quartile,
    /// ~30% of codewords recoverable
    High,
}

impl ErrorCorrection {
    /// Parse a level from its name or single-letter form (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Some(Self::Low),
            "m" | "medium" => Some(Self::Medium),
            "q" | "quartile" => Some(Self::Quartile),
            "h" | "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Single-letter label as printed on QR specifications
    pub fn letter(self) -> char {
        match self {
            Self::Low => 'L',
            Self::Medium => 'M',
            Self::Quartile => 'Q',
            Self::High => 'H',
        }
    }
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

impl From<EcLevel> for ErrorCorrection {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => Self::Low,
            EcLevel::M => Self::Medium,
            EcLevel::Q => Self::Quartile,
            EcLevel::H => Self::High,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            format!("Unsupported error correction level '{value}', expected L, M, Q or H")
        })
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A fully validated generation request.
///
/// Built from [`crate::config::QrOptions::to_request`], or directly via
/// [`QrRequest::new`] which starts from the menu defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrRequest {
    /// Text to encode
    pub payload: String,
    /// Requested symbol version (minimum when `fit` is set)
    pub version: i16,
    /// Grow the version until the payload fits
    pub fit: bool,
    /// Error correction level
    pub error_correction: ErrorCorrection,
    /// Pixels per module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// Colour of dark modules
    pub fill_color: QrColor,
    /// Colour of light modules and the quiet zone
    pub background_color: QrColor,
}

impl QrRequest {
    /// Request for `payload` with the stock rendering parameters.
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            version: 1,
            fit: true,
            error_correction: ErrorCorrection::Medium,
            box_size: 10,
            border: MIN_BORDER,
            fill_color: QrColor::BLACK,
            background_color: QrColor::WHITE,
        }
    }

    /// Check the request invariants.
    pub fn validate(&self) -> Result<()> {
        if self.payload.is_empty() {
            return Err(Error::Config("QR payload must not be empty".to_string()));
        }
        if !(1..=MAX_VERSION).contains(&self.version) {
            return Err(Error::Config(format!(
                "QR version {} out of range, expected 1..={MAX_VERSION}",
                self.version
            )));
        }
        if self.box_size == 0 {
            return Err(Error::Config("Box size must be at least 1 pixel".to_string()));
        }
        if self.border < MIN_BORDER {
            return Err(Error::Config(format!(
                "Border of {} modules is below the {MIN_BORDER}-module quiet zone",
                self.border
            )));
        }
        if self.fill_color == self.background_color {
            return Err(Error::Config(format!(
                "Fill and background colours are both {}",
                self.fill_color
            )));
        }
        // Largest symbol at this style must still be addressable.
        self.style().image_side(MAX_VERSION as usize * 4 + 17)?;
        Ok(())
    }

    /// Encoder matching this request
    pub fn encoder(&self) -> QrEncoder {
        QrEncoder::with_ecc_level(self.error_correction.into())
            .min_version(self.version)
            .fit(self.fit)
    }

    /// Rendering style matching this request
    pub fn style(&self) -> RenderStyle {
        RenderStyle {
            box_size: self.box_size,
            border: self.border,
            fill: self.fill_color,
            background: self.background_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_payload_from_string() {
        let payload = QrPayload::from_string("https://example.com/".to_string());
        assert_eq!(payload.as_str(), Some("https://example.com/"));
        assert_eq!(payload.len(), 20);
    }

    #[test]
    fn test_error_correction_parse() {
        assert_eq!(ErrorCorrection::parse("m"), Some(ErrorCorrection::Medium));
        assert_eq!(ErrorCorrection::parse("HIGH"), Some(ErrorCorrection::High));
        assert_eq!(ErrorCorrection::parse(" q "), Some(ErrorCorrection::Quartile));
        assert!("x".parse::<ErrorCorrection>().is_err());
        assert_eq!(ErrorCorrection::Low.to_string(), "L");
    }

    #[test]
    fn test_default_request_is_valid() {
        let request = QrRequest::new("https://mhanna-menu.onrender.com/");
        assert!(request.validate().is_ok());
        assert_eq!(request.version, 1);
        assert!(request.fit);
        assert_eq!(request.box_size, 10);
        assert_eq!(request.border, 4);
    }

    #[test]
    fn test_request_rejects_bad_parameters() {
        let base = QrRequest::new("data");

        let mut empty = base.clone();
        empty.payload.clear();
        assert!(matches!(empty.validate(), Err(Error::Config(_))));

        let mut version = base.clone();
        version.version = 41;
        assert!(matches!(version.validate(), Err(Error::Config(_))));

        let mut border = base.clone();
        border.border = 3;
        assert!(matches!(border.validate(), Err(Error::Config(_))));

        let mut boxes = base.clone();
        boxes.box_size = 0;
        assert!(matches!(boxes.validate(), Err(Error::Config(_))));

        let mut colours = base.clone();
        colours.background_color = QrColor::BLACK;
        assert!(matches!(colours.validate(), Err(Error::Config(_))));

        let mut huge = base;
        huge.box_size = u32::MAX / 2;
        assert!(matches!(huge.validate(), Err(Error::Config(_))));
    }
}
