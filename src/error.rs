//! Error types for menuqr operations

use thiserror::Error;

/// Result type alias using menuqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for menuqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// QR code encoding failed for a reason other than capacity
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// Payload does not fit into any permitted symbol version
    #[error("Payload of {bytes} bytes does not fit in QR version {version} (auto-fit: {fit})")]
    DataTooLong {
        /// Payload length in bytes
        bytes: usize,
        /// Requested (minimum) symbol version
        version: i16,
        /// Whether larger versions were tried as well
        fit: bool,
    },

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// Decoded content differs from the encoded payload
    #[error("Decoded payload {found:?} does not match expected {expected:?}")]
    PayloadMismatch {
        /// Payload that was encoded
        expected: String,
        /// Payload read back from the image
        found: String,
    },

    /// Unrecognised colour specification
    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_too_long_reports_fit_mode() {
        let fixed = Error::DataTooLong {
            bytes: 33,
            version: 1,
            fit: false,
        };
        assert_eq!(
            fixed.to_string(),
            "Payload of 33 bytes does not fit in QR version 1 (auto-fit: false)"
        );

        let fitted = Error::DataTooLong {
            bytes: 4000,
            version: 1,
            fit: true,
        };
        assert!(fitted.to_string().ends_with("(auto-fit: true)"));
    }
}
