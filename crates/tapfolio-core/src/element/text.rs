//! Typography attributes for text elements.

use serde::{Deserialize, Serialize};

/// Font family options offered by the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Clean sans-serif (default).
    #[default]
    Sans,
    /// Classic serif.
    Serif,
    /// Monospace, used for handles and codes.
    Mono,
    /// Handwritten script for decorative labels.
    Script,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Sans => "Inter",
            FontFamily::Serif => "Lora",
            FontFamily::Mono => "JetBrains Mono",
            FontFamily::Script => "Caveat",
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::Sans,
            FontFamily::Serif,
            FontFamily::Mono,
            FontFamily::Script,
        ]
    }
}

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    /// Numeric CSS-style weight, as consumed by the renderer.
    pub fn value(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }

    /// Get all available font weights.
    pub fn all() -> &'static [FontWeight] {
        &[FontWeight::Light, FontWeight::Regular, FontWeight::Bold]
    }
}

/// Horizontal alignment within the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_values() {
        assert_eq!(FontWeight::Light.value(), 300);
        assert_eq!(FontWeight::Regular.value(), 400);
        assert_eq!(FontWeight::Bold.value(), 700);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(FontFamily::default(), FontFamily::Sans);
        assert_eq!(FontWeight::default(), FontWeight::Regular);
        assert_eq!(TextAlign::default(), TextAlign::Left);
    }
}
