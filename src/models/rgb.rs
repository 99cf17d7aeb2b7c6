//! RGB color handling with hex parsing and serialization.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// RGB color value with hex string representation.
///
/// Axis colors in `axis_definitions.json` are written as `#RRGGBB`. Parsing
/// them into this type at load time means a typo in the data file stops the
/// server from starting instead of producing an unstyled chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb"
    ///
    /// # Examples
    ///
    /// ```
    /// use reading_atlas::models::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#FF6B6B").unwrap();
    /// assert_eq!(color, RgbColor::new(255, 107, 107));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 || !hex.is_ascii() {
            anyhow::bail!("Invalid hex color format '{hex}'. Expected 6 hex digits (RRGGBB)");
        }

        let r = u8::from_str_radix(&hex[0..2], 16)
            .context(format!("Invalid red channel in hex color '{hex}'"))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .context(format!("Invalid green channel in hex color '{hex}'"))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .context(format!("Invalid blue channel in hex color '{hex}'"))?;

        Ok(Self::new(r, g, b))
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(|e| serde::de::Error::custom(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_with_and_without_prefix() {
        assert_eq!(
            RgbColor::from_hex("#2A73FF").unwrap(),
            RgbColor::new(42, 115, 255)
        );
        assert_eq!(
            RgbColor::from_hex("2acc88").unwrap(),
            RgbColor::new(42, 204, 136)
        );
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(RgbColor::from_hex("#FFF").is_err());
        assert!(RgbColor::from_hex("#GGGGGG").is_err());
        assert!(RgbColor::from_hex("").is_err());
        assert!(RgbColor::from_hex("#ÄÄÄ").is_err());
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let color: RgbColor = serde_json::from_str("\"#a78bfa\"").unwrap();
        assert_eq!(color, RgbColor::new(167, 139, 250));
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#A78BFA\"");
    }

    #[test]
    fn test_serde_rejects_bad_hex() {
        let result: Result<RgbColor, _> = serde_json::from_str("\"blue\"");
        assert!(result.is_err());
    }
}
