//! QR code decoder using rqrr

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::DynamicImage;
use std::path::Path;

/// QR code decoder, used to read generated images back
#[derive(Debug, Default, Clone, Copy)]
pub struct QrDecoder;

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self
    }

    /// Load an image file and decode every QR code in it
    pub fn decode_file(&self, path: &Path) -> Result<Vec<QrPayload>> {
        let img = image::open(path)?;
        self.decode_all(&img)
    }

    /// Decode every QR code found in an image
    pub fn decode_all(&self, img: &DynamicImage) -> Result<Vec<QrPayload>> {
        let mut prepared = rqrr::PreparedImage::prepare(img.to_luma8());

        let grids = prepared.detect_grids();

        if grids.is_empty() {
            return Err(Error::NoQrCodeFound);
        }

        let mut payloads = Vec::new();

        for grid in grids {
            match grid.decode() {
                Ok((meta, content)) => {
                    tracing::debug!(
                        "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                        meta.version,
                        meta.ecc_level,
                        content.len()
                    );
                    payloads.push(QrPayload::from_string(content));
                }
                Err(e) => tracing::warn!("Failed to decode one QR code: {:?}", e),
            }
        }

        if payloads.is_empty() {
            return Err(Error::QrDecode("No QR codes could be decoded".to_string()));
        }

        Ok(payloads)
    }
}
