//! Helpers for rendering the generation summary

use crate::qr::{ErrorCorrection, QrColor};
use hex::encode as hex_encode;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Summary of one generated QR image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// File the image was written to
    pub path: PathBuf,
    /// Encoded text
    pub payload: String,
    /// Symbol version actually used
    pub version: i16,
    /// Error correction level
    pub error_correction: ErrorCorrection,
    /// Modules per side, quiet zone excluded
    pub modules: usize,
    /// Quiet zone width in modules
    pub border: u32,
    /// Pixels per module
    pub box_size: u32,
    /// Image side length in pixels
    pub pixels: u32,
    /// Colour of dark modules
    pub fill_color: QrColor,
    /// Background colour
    pub background_color: QrColor,
    /// Outcome of reading the file back, if requested
    pub verified: Option<bool>,
}

impl GenerationReport {
    /// Structured JSON representation suitable for scripting
    pub fn json(&self) -> Value {
        json!({
            "path": self.path.display().to_string(),
            "payload": {
                "text": self.payload,
                "byte_length": self.payload.len(),
                "bytes_hex": hex_encode(self.payload.as_bytes()),
            },
            "symbol": {
                "version": self.version,
                "error_correction": self.error_correction.to_string(),
                "modules": self.modules,
            },
            "image": {
                "pixels": self.pixels,
                "box_size": self.box_size,
                "border": self.border,
                "fill_color": self.fill_color,
                "background_color": self.background_color,
            },
            "verified": self.verified,
        })
    }

    /// Human-readable lines for terminal presentation
    pub fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("QR code written to {}", self.path.display()),
            format!("  Payload: {}", self.payload),
            format!(
                "  Symbol: version {} ({}x{} modules, level {})",
                self.version, self.modules, self.modules, self.error_correction
            ),
            format!(
                "  Image: {}x{} px (box {} px, border {} modules)",
                self.pixels, self.pixels, self.box_size, self.border
            ),
        ];
        if let Some(verified) = self.verified {
            lines.push(format!(
                "  Verified: {}",
                if verified { "decoded payload matches" } else { "mismatch" }
            ));
        }
        lines
    }
}
