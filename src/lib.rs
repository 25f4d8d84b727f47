//! menuqr - QR code generator for the mhanna menu site
//!
//! Encodes a URL into a QR symbol, paints it onto a PNG with a fixed quiet
//! zone and writes the file to disk. With no configuration the output is the
//! `mhanna-menu-qr.png` code pointing at `https://mhanna-menu.onrender.com/`.
//!
//! # Example
//!
//! ```no_run
//! use menuqr::{QrRequest, config::DEFAULT_PAYLOAD};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let request = QrRequest::new(DEFAULT_PAYLOAD);
//!     let report = menuqr::generate(&request, Path::new("mhanna-menu-qr.png"))?;
//!
//!     println!("wrote version {} symbol", report.version);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{LogRotation, LoggingOptions, MenuQrConfig, OutputOptions, QrOptions};
pub use output::GenerationReport;
pub use qr::{
    ErrorCorrection, QrColor, QrDecoder, QrEncoder, QrPayload, QrRequest, QrSymbol, RenderStyle,
};

use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Generate the QR image described by `request` and write it to `path` as PNG.
///
/// Any existing file at `path` is replaced. Nothing is written when the
/// payload cannot be encoded.
pub fn generate(request: &QrRequest, path: &Path) -> Result<GenerationReport> {
    let (symbol, image) = build(request)?;
    save(request, &symbol, &image, path)
}

/// Write a rendered symbol to `path` as PNG, creating parent directories.
pub fn save(
    request: &QrRequest,
    symbol: &QrSymbol,
    image: &DynamicImage,
    path: &Path,
) -> Result<GenerationReport> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    image.save_with_format(path, ImageFormat::Png)?;
    info!(path = %path.display(), "QR code written");

    Ok(GenerationReport {
        path: path.to_path_buf(),
        payload: request.payload.clone(),
        version: symbol.version(),
        error_correction: symbol.error_correction(),
        modules: symbol.width(),
        border: request.border,
        box_size: request.box_size,
        pixels: image.width(),
        fill_color: request.fill_color,
        background_color: request.background_color,
        verified: None,
    })
}

/// Encode and render `request` without touching the filesystem.
pub fn build(request: &QrRequest) -> Result<(QrSymbol, DynamicImage)> {
    request.validate()?;

    let payload = QrPayload::from_string(request.payload.clone());
    let symbol = request.encoder().encode(&payload)?;
    debug!(?symbol, "Rendering QR symbol");

    let image = symbol.render(&request.style())?;
    Ok((symbol, image))
}

/// Decode the image at `path` and check one of its codes carries exactly `expected`.
pub fn verify(path: &Path, expected: &str) -> Result<()> {
    let decoded = QrDecoder::new().decode_file(path)?;
    if decoded.iter().any(|payload| payload.as_str() == Some(expected)) {
        debug!(path = %path.display(), codes = decoded.len(), "Decoded payload matches");
        return Ok(());
    }

    Err(Error::PayloadMismatch {
        expected: expected.to_string(),
        found: decoded
            .iter()
            .filter_map(QrPayload::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    })
}
