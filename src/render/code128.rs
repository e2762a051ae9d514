//! CODE128 encoding via `barcoders`, character set B

use barcoders::sym::code128::Code128;
use tracing::debug;

use super::{BarcodeImage, BarcodeRenderer, RenderError, RenderOptions, Symbology};

/// Set B start selector understood by `barcoders`
const CHARSET_B: char = 'Ɓ';

/// Printable ASCII covered by set B
fn is_encodable(c: char) -> bool {
    (' '..='~').contains(&c)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Code128Renderer;

impl BarcodeRenderer for Code128Renderer {
    fn render(&self, data: &str, options: &RenderOptions) -> Result<BarcodeImage, RenderError> {
        if data.is_empty() {
            return Err(RenderError::Empty);
        }
        if let Some((position, character)) = data.chars().enumerate().find(|(_, c)| !is_encodable(*c)) {
            return Err(RenderError::InvalidData {
                format: Symbology::Code128,
                character,
                position,
            });
        }

        let symbol = Code128::new(format!("{CHARSET_B}{data}")).map_err(|e| RenderError::Encoding {
            format: Symbology::Code128,
            reason: e.to_string(),
        })?;
        let modules: Vec<bool> = symbol.encode().into_iter().map(|m| m == 1).collect();
        debug!(len = data.len(), modules = modules.len(), "Encoded CODE128 symbol");

        BarcodeImage::new(modules, data.to_string(), options.clone())
    }
}
