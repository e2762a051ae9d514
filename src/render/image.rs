//! Rendered symbol: module pattern, raster and PNG export

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use super::{RenderError, RenderOptions};
use crate::constants::render::MAX_PIXEL_WIDTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeImage {
    modules: Vec<bool>,
    text: String,
    options: RenderOptions,
    pixel_width: u32,
}

impl BarcodeImage {
    /// Fails with [`RenderError::TooLarge`] when the raster would exceed
    /// `MAX_PIXEL_WIDTH`
    pub fn new(modules: Vec<bool>, text: String, options: RenderOptions) -> Result<Self, RenderError> {
        let pixel_width = u32::try_from(modules.len())
            .ok()
            .and_then(|count| count.checked_mul(options.width))
            .and_then(|bars| bars.checked_add(options.margin.checked_mul(2)?))
            .filter(|width| *width <= MAX_PIXEL_WIDTH)
            .ok_or(RenderError::TooLarge {
                format: options.format,
                modules: modules.len(),
                max: MAX_PIXEL_WIDTH,
            })?;

        Ok(Self {
            modules,
            text,
            options,
            pixel_width,
        })
    }

    /// One flag per narrow module; `true` is a bar
    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    /// Human-readable value printed under the bars
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Full width including the margin on both sides
    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    /// Full height of the bar area including margins
    pub fn pixel_height(&self) -> u32 {
        self.options.height + 2 * self.options.margin
    }

    /// Contiguous bars as `(x, width)` in pixels from the left edge of the symbol
    pub fn bars(&self) -> Vec<(u32, u32)> {
        let mut bars = Vec::new();
        let mut run_start = None;
        for (i, &bar) in self.modules.iter().chain(std::iter::once(&false)).enumerate() {
            match (bar, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    bars.push((
                        start as u32 * self.options.width,
                        (i - start) as u32 * self.options.width,
                    ));
                    run_start = None;
                }
                _ => {}
            }
        }
        bars
    }

    /// RGBA8 raster of the bar area, row-major
    pub fn to_rgba(&self) -> Vec<u8> {
        let (width, height) = (self.pixel_width(), self.pixel_height());
        let margin = self.options.margin;
        let background = self.options.background.to_rgba();
        let line = self.options.line_color.to_rgba();

        let mut row = Vec::with_capacity(width as usize * 4);
        for x in 0..width {
            let is_bar = x >= margin
                && x < width - margin
                && self.modules[((x - margin) / self.options.width) as usize];
            row.extend_from_slice(if is_bar { &line } else { &background });
        }
        let blank: Vec<u8> = background.repeat(width as usize);

        let mut pixels = Vec::with_capacity(row.len() * height as usize);
        for y in 0..height {
            if y < margin || y >= height - margin {
                pixels.extend_from_slice(&blank);
            } else {
                pixels.extend_from_slice(&row);
            }
        }
        pixels
    }

    pub fn write_png(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.pixel_width(), self.pixel_height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().context("Failed to write PNG header")?;
        writer
            .write_image_data(&self.to_rgba())
            .context("Failed to write PNG data")?;
        writer.finish().context("Failed to finish PNG")?;

        info!(path = %path.display(), width = self.pixel_width(), height = self.pixel_height(), "Exported barcode");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use std::fs;

    fn sample() -> BarcodeImage {
        // bar, bar, space, bar
        BarcodeImage::new(vec![true, true, false, true], "x".to_string(), RenderOptions::fixed()).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let image = sample();
        assert_eq!(image.pixel_width(), 4 * 2 + 2 * 10);
        assert_eq!(image.pixel_height(), 100 + 2 * 10);
    }

    #[test]
    fn test_oversized_symbol_is_rejected() {
        let modules = vec![true; (MAX_PIXEL_WIDTH / 2) as usize];
        let err = BarcodeImage::new(modules, "x".to_string(), RenderOptions::fixed()).unwrap_err();
        assert!(matches!(err, RenderError::TooLarge { max: MAX_PIXEL_WIDTH, .. }));

        let options = RenderOptions {
            width: u32::MAX,
            ..RenderOptions::fixed()
        };
        assert!(BarcodeImage::new(vec![true, false], "x".to_string(), options).is_err());
    }

    #[test]
    fn test_bars_merge_adjacent_modules() {
        assert_eq!(sample().bars(), vec![(0, 4), (6, 2)]);
    }

    #[test]
    fn test_raster_layout() {
        let image = sample();
        let pixels = image.to_rgba();
        let width = image.pixel_width() as usize;
        assert_eq!(pixels.len(), width * image.pixel_height() as usize * 4);

        let pixel = |x: usize, y: usize| {
            let i = (y * width + x) * 4;
            [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
        };
        let black = Rgb::BLACK.to_rgba();
        let white = Rgb::WHITE.to_rgba();

        assert_eq!(pixel(0, 50), white, "left margin");
        assert_eq!(pixel(10, 50), black, "first bar");
        assert_eq!(pixel(14, 50), white, "space module");
        assert_eq!(pixel(16, 50), black, "last bar");
        assert_eq!(pixel(10, 5), white, "top margin");
        assert_eq!(pixel(10, 115), white, "bottom margin");
    }

    #[test]
    fn test_write_png_signature() {
        let path = std::env::temp_dir().join(format!("barcode-wallet-export-{}.png", std::process::id()));
        sample().write_png(&path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        fs::remove_file(&path).unwrap();
    }
}
