//! Barcode rendering
//!
//! The renderer turns a data string into a module pattern plus the options
//! it was drawn with; the GUI paints it and the CLI exports it as PNG.

use std::fmt;
use thiserror::Error;

use crate::color::Rgb;
use crate::constants::render;

mod code128;
mod image;

pub use code128::Code128Renderer;
pub use image::BarcodeImage;

/// Barcode symbology; only one linear format is supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Code128,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbology::Code128 => f.write_str("CODE128"),
        }
    }
}

/// Drawing options; pixel values are per narrow module / whole symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub display_value: bool,
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub format: Symbology,
    pub background: Rgb,
    pub line_color: Rgb,
}

impl RenderOptions {
    /// The one option set every barcode is shown with
    pub fn fixed() -> Self {
        Self {
            display_value: render::DISPLAY_VALUE,
            width: render::MODULE_WIDTH,
            height: render::HEIGHT,
            margin: render::MARGIN,
            format: Symbology::Code128,
            background: Rgb::parse_or(render::BACKGROUND, Rgb::WHITE),
            line_color: Rgb::parse_or(render::LINE_COLOR, Rgb::BLACK),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Nothing to encode")]
    Empty,

    #[error("{format} cannot encode {character:?} at position {position}")]
    InvalidData {
        format: Symbology,
        character: char,
        position: usize,
    },

    #[error("{format} encoding failed: {reason}")]
    Encoding { format: Symbology, reason: String },

    #[error("{format} symbol of {modules} modules is wider than {max} pixels")]
    TooLarge {
        format: Symbology,
        modules: usize,
        max: u32,
    },
}

/// Black-box symbol encoder
pub trait BarcodeRenderer {
    fn render(&self, data: &str, options: &RenderOptions) -> Result<BarcodeImage, RenderError>;
}
