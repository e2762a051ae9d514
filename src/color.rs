//! Hex color parsing and brightness scaling

/// Opaque 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `RRGGBB` with an optional leading `#`
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::new(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        ))
    }

    /// Parse, falling back to `fallback` on malformed input
    pub fn parse_or(hex: &str, fallback: Rgb) -> Self {
        Self::parse(hex).unwrap_or(fallback)
    }

    /// Multiply every channel by `percent / 100`, saturating at 255
    pub fn brightened(self, percent: u16) -> Self {
        let scale = |c: u8| ((c as u32 * percent as u32) / 100).min(0xFF) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xFF]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        assert_eq!(Rgb::parse("#ffffff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse("000000"), Some(Rgb::BLACK));
        assert_eq!(Rgb::parse("#12AB34"), Some(Rgb::new(0x12, 0xAB, 0x34)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Rgb::parse("#fff"), None);
        assert_eq!(Rgb::parse("#gggggg"), None);
        assert_eq!(Rgb::parse("+12345"), None);
        assert_eq!(Rgb::parse(""), None);
        assert_eq!(Rgb::parse_or("nope", Rgb::BLACK), Rgb::BLACK);
    }

    #[test]
    fn test_brightened_saturates() {
        assert_eq!(Rgb::WHITE.brightened(120), Rgb::WHITE);
        assert_eq!(Rgb::new(100, 50, 0).brightened(120), Rgb::new(120, 60, 0));
        assert_eq!(Rgb::new(100, 50, 0).brightened(100), Rgb::new(100, 50, 0));
    }
}
