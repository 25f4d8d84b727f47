//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::{ErrorCorrection, MAX_VERSION, QrPayload, RenderStyle};
use image::DynamicImage;
use qrcode::render::unicode;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};

/// QR code encoder
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    /// Error correction level
    ecc_level: EcLevel,
    /// Smallest symbol version to try
    min_version: i16,
    /// Grow past `min_version` when the payload does not fit
    fit: bool,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (Medium ECC, version 1 upward)
    pub fn new() -> Self {
        Self::with_ecc_level(EcLevel::M)
    }

    /// Create a new QR encoder with a specific error correction level
    pub fn with_ecc_level(ecc_level: EcLevel) -> Self {
        Self {
            ecc_level,
            min_version: 1,
            fit: true,
        }
    }

    /// Set the starting symbol version
    pub fn min_version(mut self, version: i16) -> Self {
        self.min_version = version;
        self
    }

    /// Enable or disable growing the version to fit the payload
    pub fn fit(mut self, fit: bool) -> Self {
        self.fit = fit;
        self
    }

    /// Lay out the payload into a finalized symbol.
    ///
    /// Versions are tried from `min_version` upward (or only `min_version`
    /// when fitting is disabled). Data is never truncated.
    pub fn encode(&self, payload: &QrPayload) -> Result<QrSymbol> {
        if !(1..=MAX_VERSION).contains(&self.min_version) {
            return Err(Error::QrEncode(format!(
                "Invalid QR version {}",
                self.min_version
            )));
        }

        let last = if self.fit { MAX_VERSION } else { self.min_version };
        for version in self.min_version..=last {
            match QrCode::with_version(payload.as_bytes(), Version::Normal(version), self.ecc_level) {
                Ok(code) => {
                    tracing::debug!(
                        version,
                        ecc_level = ?self.ecc_level,
                        modules = code.width(),
                        bytes = payload.len(),
                        "Finalized QR symbol"
                    );
                    return Ok(QrSymbol { code, version });
                }
                Err(QrError::DataTooLong) => {
                    tracing::trace!(version, "Payload does not fit, trying next version");
                }
                Err(e) => {
                    return Err(Error::QrEncode(format!("Failed to create QR code: {}", e)));
                }
            }
        }

        Err(Error::DataTooLong {
            bytes: payload.len(),
            version: self.min_version,
            fit: self.fit,
        })
    }

    /// Encode a string into a QR symbol
    pub fn encode_string(&self, data: &str) -> Result<QrSymbol> {
        let payload = QrPayload::from_string(data.to_string());
        self.encode(&payload)
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// A finalized QR symbol ready to be rendered
pub struct QrSymbol {
    code: QrCode,
    version: i16,
}

impl QrSymbol {
    /// Symbol version chosen by the encoder
    pub fn version(&self) -> i16 {
        self.version
    }

    /// Error correction level of the symbol
    pub fn error_correction(&self) -> ErrorCorrection {
        self.code.error_correction_level().into()
    }

    /// Number of modules per side, quiet zone excluded
    pub fn width(&self) -> usize {
        self.code.width()
    }

    /// Whether module `(x, y)` is dark
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.code[(x, y)] == Color::Dark
    }

    /// Render the symbol to a raster image
    pub fn render(&self, style: &RenderStyle) -> Result<DynamicImage> {
        style.paint(self.width(), |x, y| self.is_dark(x, y))
    }

    /// Render the symbol as Unicode half blocks for terminal preview
    pub fn to_terminal(&self) -> String {
        self.code
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .quiet_zone(true)
            .build()
    }
}

impl std::fmt::Debug for QrSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrSymbol")
            .field("version", &self.version)
            .field("error_correction", &self.error_correction())
            .field("width", &self.width())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QrDecoder;

    const MENU_URL: &str = "https://mhanna-menu.onrender.com/";

    #[test]
    fn test_fit_grows_version_for_menu_url() {
        let symbol = QrEncoder::new().encode_string(MENU_URL).unwrap();
        assert_eq!(symbol.version(), 3);
        assert_eq!(symbol.width(), 29);
        assert_eq!(symbol.error_correction(), ErrorCorrection::Medium);
    }

    #[test]
    fn test_fixed_version_rejects_oversized_payload() {
        let result = QrEncoder::new().fit(false).encode_string(MENU_URL);
        assert!(matches!(
            result,
            Err(Error::DataTooLong {
                bytes: 33,
                version: 1,
                fit: false
            })
        ));
    }

    #[test]
    fn test_fixed_version_accepts_fitting_payload() {
        let symbol = QrEncoder::new()
            .min_version(5)
            .fit(false)
            .encode_string("short")
            .unwrap();
        assert_eq!(symbol.version(), 5);
        assert_eq!(symbol.width(), 37);
    }

    #[test]
    fn test_payload_beyond_version_40_fails() {
        let huge = "x".repeat(4000);
        let result = QrEncoder::with_ecc_level(EcLevel::L).encode_string(&huge);
        assert!(matches!(result, Err(Error::DataTooLong { fit: true, .. })));
    }

    #[test]
    fn test_invalid_min_version() {
        let result = QrEncoder::new().min_version(0).encode_string("a");
        assert!(matches!(result, Err(Error::QrEncode(_))));
    }

    #[test]
    fn test_finder_pattern_corner_is_dark() {
        let symbol = QrEncoder::new().encode_string(MENU_URL).unwrap();
        assert!(symbol.is_dark(0, 0));
        assert!(!symbol.is_dark(7, 7)); // separator
    }

    #[test]
    fn test_terminal_preview_has_rows() {
        let symbol = QrEncoder::new().encode_string("hi").unwrap();
        let preview = symbol.to_terminal();
        // 21 modules + 8 quiet zone rows, two rows per line
        assert!(preview.lines().count() >= 14);
    }

    #[test]
    fn test_round_trip() {
        let symbol = QrEncoder::new().encode_string(MENU_URL).unwrap();
        let image = symbol.render(&RenderStyle::default()).unwrap();
        let decoded = QrDecoder::new().decode_all(&image).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].as_str(), Some(MENU_URL));
    }
}
