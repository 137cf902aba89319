//! Colors used to paint brackets by nesting order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of colors brackets rotate through.
pub const NUM_COLORS: usize = 3;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// A color specification could not be parsed.
pub enum ColorParseError {
    #[error("empty color specification")]
    /// The input was empty.
    Empty,

    #[error("color '{0}' must start with '#' or '0x'")]
    /// The input had no recognized prefix.
    MissingPrefix(String),

    #[error("color '{0}' must have 3 or 6 hex digits")]
    /// The digit count was neither 3 nor 6.
    BadLength(String),

    #[error("color '{0}' contains a non-hex digit")]
    /// A digit was not `0-9a-fA-F`.
    BadDigit(String),
}

impl Color {
    /// Create a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb` or `0xrrggbb`.
    pub fn parse(spec: &str) -> Result<Self, ColorParseError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ColorParseError::Empty);
        }

        let digits = spec
            .strip_prefix('#')
            .or_else(|| spec.strip_prefix("0x"))
            .or_else(|| spec.strip_prefix("0X"))
            .ok_or_else(|| ColorParseError::MissingPrefix(spec.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(spec.to_string()));
        }

        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorParseError::BadDigit(spec.to_string()))
        };

        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc is #aabbcc
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            _ => Err(ColorParseError::BadLength(spec.to_string())),
        }
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Pack as `0x00BBGGRR`, the layout Scintilla-style widgets take colors in.
    pub fn to_bgr(self) -> u32 {
        u32::from(self.r) | (u32::from(self.g) << 8) | (u32::from(self.b) << 16)
    }

    /// Unpack a `0x00BBGGRR` value.
    pub fn from_bgr(bgr: u32) -> Self {
        Self::new(
            (bgr & 0xff) as u8,
            ((bgr >> 8) & 0xff) as u8,
            ((bgr >> 16) & 0xff) as u8,
        )
    }

    /// Returns `true` if this is a dark (background) color.
    ///
    /// Perceived brightness approximation `(3r + 4g + b) / 8`, dark below 125.
    pub fn is_dark(self) -> bool {
        let (r, g, b) = (u32::from(self.r), u32::from(self.g), u32::from(self.b));
        let y = ((r << 1) + r + (g << 2) + b) >> 3;
        y < 125
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// The colors brackets rotate through, indexed by color slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Palette(pub [Color; NUM_COLORS]);

impl Palette {
    /// Defaults for light backgrounds.
    pub const fn light_background() -> Self {
        Self([
            Color::new(0x00, 0x80, 0xff),
            Color::new(0xc0, 0x00, 0xc0),
            Color::new(0x00, 0x90, 0x00),
        ])
    }

    /// Defaults for dark backgrounds.
    pub const fn dark_background() -> Self {
        Self([
            Color::new(0xff, 0xd7, 0x00),
            Color::new(0xda, 0x70, 0xd6),
            Color::new(0x17, 0x9f, 0xff),
        ])
    }

    /// Built-in defaults matching `background`.
    pub fn default_for(background: Color) -> Self {
        if background.is_dark() {
            Self::dark_background()
        } else {
            Self::light_background()
        }
    }

    /// The color for `slot` (taken modulo [`NUM_COLORS`]).
    pub fn color(&self, slot: usize) -> Color {
        self.0[slot % NUM_COLORS]
    }

    /// Colors as `#rrggbb` strings.
    pub fn to_hex(&self) -> [String; NUM_COLORS] {
        self.0.map(Color::to_hex)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::light_background()
    }
}

/// Follows the host's background color and reports when the default palette must switch.
///
/// Only a dark/light flip matters; any other background change keeps the current palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTracker {
    background: Color,
    use_defaults: bool,
}

impl PaletteTracker {
    /// Start tracking from `background`.
    pub fn new(background: Color, use_defaults: bool) -> Self {
        Self {
            background,
            use_defaults,
        }
    }

    /// The last observed background.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Toggle between built-in defaults and custom colors.
    pub fn set_use_defaults(&mut self, use_defaults: bool) {
        self.use_defaults = use_defaults;
    }

    /// Record the current background.
    ///
    /// Returns the new default palette if the background flipped between dark and light while
    /// defaults are in use.
    pub fn observe(&mut self, background: Color) -> Option<Palette> {
        let previous = std::mem::replace(&mut self.background, background);
        if previous == background || previous.is_dark() == background.is_dark() {
            return None;
        }
        if !self.use_defaults {
            return None;
        }
        tracing::debug!(
            from = %previous,
            to = %background,
            "background switched, changing default palette"
        );
        Some(Palette::default_for(background))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Color::parse("#ff8000"), Ok(Color::new(0xff, 0x80, 0x00)));
        assert_eq!(Color::parse("0xFF8000"), Ok(Color::new(0xff, 0x80, 0x00)));
        assert_eq!(Color::parse(" #f80 "), Ok(Color::new(0xff, 0x88, 0x00)));
        assert_eq!(Color::parse(""), Err(ColorParseError::Empty));
        assert!(matches!(
            Color::parse("ff8000"),
            Err(ColorParseError::MissingPrefix(_))
        ));
        assert!(matches!(
            Color::parse("#ff80"),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            Color::parse("#gg8000"),
            Err(ColorParseError::BadDigit(_))
        ));
    }

    #[test]
    fn test_hex_and_bgr() {
        let color = Color::new(0x12, 0x34, 0x56);
        assert_eq!(color.to_hex(), "#123456");
        assert_eq!(color.to_bgr(), 0x0056_3412);
        assert_eq!(Color::from_bgr(0x0056_3412), color);
        assert_eq!(color.to_string().parse::<Color>(), Ok(color));
    }

    #[test]
    fn test_darkness() {
        assert!(Color::new(0, 0, 0).is_dark());
        assert!(Color::new(0x28, 0x2c, 0x34).is_dark());
        assert!(!Color::new(0xff, 0xff, 0xff).is_dark());
        assert!(!Color::new(0xf0, 0xf0, 0xe0).is_dark());
    }

    #[test]
    fn test_palette_for_background() {
        assert_eq!(
            Palette::default_for(Color::new(0, 0, 0)),
            Palette::dark_background()
        );
        assert_eq!(
            Palette::default_for(Color::new(255, 255, 255)),
            Palette::light_background()
        );
        let palette = Palette::light_background();
        assert_eq!(palette.color(4), palette.color(1));
    }

    #[test]
    fn test_tracker_reports_only_flips() {
        let white = Color::new(255, 255, 255);
        let cream = Color::new(0xf0, 0xf0, 0xe0);
        let black = Color::new(0, 0, 0);

        let mut tracker = PaletteTracker::new(white, true);
        assert_eq!(tracker.observe(cream), None);
        assert_eq!(tracker.observe(black), Some(Palette::dark_background()));
        assert_eq!(tracker.observe(black), None);

        tracker.set_use_defaults(false);
        assert_eq!(tracker.observe(white), None);
        assert_eq!(tracker.background(), white);
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::new(1, 2, 3)).unwrap();
        assert_eq!(json, r##""#010203""##);
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::new(1, 2, 3));
        assert!(serde_json::from_str::<Color>(r#""nope""#).is_err());
    }
}
