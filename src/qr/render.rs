//! Raster rendering of a finalized symbol

use crate::error::{Error, Result};
use crate::qr::QrColor;
use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage};

/// Pixel geometry and colours used to paint a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    /// Pixels per module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// Colour of dark modules
    pub fill: QrColor,
    /// Colour of light modules and the quiet zone
    pub background: QrColor,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            box_size: 10,
            border: crate::qr::MIN_BORDER,
            fill: QrColor::BLACK,
            background: QrColor::WHITE,
        }
    }
}

impl RenderStyle {
    /// Side length in pixels of a symbol `modules` wide, quiet zone included.
    pub fn image_side(&self, modules: usize) -> Result<u32> {
        u32::try_from(modules)
            .ok()
            .and_then(|m| m.checked_add(self.border.checked_mul(2)?))
            .and_then(|m| m.checked_mul(self.box_size))
            .ok_or_else(|| {
                Error::Config(format!(
                    "Image for {modules} modules with box size {} and border {} is too large",
                    self.box_size, self.border
                ))
            })
    }

    /// Paint a `modules`-wide grid; `is_dark(x, y)` is queried per module.
    pub(crate) fn paint<F>(&self, modules: usize, is_dark: F) -> Result<DynamicImage>
    where
        F: Fn(usize, usize) -> bool,
    {
        let side = self.image_side(modules)?;
        let box_size = self.box_size;
        let border = self.border;

        let module_at = |px: u32, py: u32| -> bool {
            let (mx, my) = (px / box_size, py / box_size);
            if mx < border || my < border {
                return false;
            }
            let (x, y) = ((mx - border) as usize, (my - border) as usize);
            x < modules && y < modules && is_dark(x, y)
        };

        if self.fill.is_gray() && self.background.is_gray() {
            let (dark, light) = (self.fill.to_luma(), self.background.to_luma());
            let image: GrayImage = ImageBuffer::from_fn(side, side, |px, py| {
                if module_at(px, py) { dark } else { light }
            });
            Ok(DynamicImage::ImageLuma8(image))
        } else {
            let (dark, light) = (self.fill.to_rgb(), self.background.to_rgb());
            let image: RgbImage = ImageBuffer::from_fn(side, side, |px, py| {
                if module_at(px, py) { dark } else { light }
            });
            Ok(DynamicImage::ImageRgb8(image))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    #[test]
    fn image_side_includes_quiet_zone() {
        let style = RenderStyle::default();
        assert_eq!(style.image_side(21).unwrap(), (21 + 8) * 10);
    }

    #[test]
    fn image_side_detects_overflow() {
        let style = RenderStyle {
            box_size: u32::MAX,
            ..RenderStyle::default()
        };
        assert!(style.image_side(21).is_err());
    }

    #[test]
    fn paints_single_module_at_offset() {
        let style = RenderStyle {
            box_size: 2,
            border: 4,
            ..RenderStyle::default()
        };
        let image = style.paint(3, |x, y| x == 1 && y == 2).unwrap();
        assert_eq!(image.dimensions(), (22, 22));

        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        // module (1, 2) covers pixels x 10..12, y 12..14
        assert_eq!(image.get_pixel(10, 12), black);
        assert_eq!(image.get_pixel(11, 13), black);
        assert_eq!(image.get_pixel(9, 12), white);
        assert_eq!(image.get_pixel(12, 12), white);
        assert_eq!(image.get_pixel(10, 14), white);
    }

    #[test]
    fn grey_styles_render_luma_and_colour_styles_render_rgb() {
        let grey = RenderStyle::default().paint(1, |_, _| true).unwrap();
        assert!(matches!(grey, DynamicImage::ImageLuma8(_)));

        let coloured = RenderStyle {
            fill: QrColor::rgb(0, 0, 0x80),
            ..RenderStyle::default()
        }
        .paint(1, |_, _| true)
        .unwrap();
        assert!(matches!(coloured, DynamicImage::ImageRgb8(_)));
        assert_eq!(coloured.get_pixel(45, 45), Rgba([0, 0, 0x80, 255]));
    }
}
