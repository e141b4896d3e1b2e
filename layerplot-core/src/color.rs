use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color of a drawn primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unrecognized color '{0}'")]
pub struct ColorParseError(pub String);

/// The default property cycle (tab10).
pub const DEFAULT_CYCLE: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

const NAMED: &[(&str, Color)] = &[
    ("b", Color::rgb(0, 0, 255)),
    ("blue", Color::rgb(0, 0, 255)),
    ("g", Color::rgb(0, 128, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("r", Color::rgb(255, 0, 0)),
    ("red", Color::rgb(255, 0, 0)),
    ("c", Color::rgb(0, 191, 191)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("m", Color::rgb(191, 0, 191)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("y", Color::rgb(191, 191, 0)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("k", Color::rgb(0, 0, 0)),
    ("black", Color::rgb(0, 0, 0)),
    ("w", Color::rgb(255, 255, 255)),
    ("white", Color::rgb(255, 255, 255)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("brown", Color::rgb(165, 42, 42)),
    ("pink", Color::rgb(255, 192, 203)),
    ("navy", Color::rgb(0, 0, 128)),
    ("teal", Color::rgb(0, 128, 128)),
    ("tab:blue", DEFAULT_CYCLE[0]),
    ("tab:orange", DEFAULT_CYCLE[1]),
    ("tab:green", DEFAULT_CYCLE[2]),
    ("tab:red", DEFAULT_CYCLE[3]),
    ("tab:purple", DEFAULT_CYCLE[4]),
    ("tab:brown", DEFAULT_CYCLE[5]),
    ("tab:pink", DEFAULT_CYCLE[6]),
    ("tab:gray", DEFAULT_CYCLE[7]),
    ("tab:olive", DEFAULT_CYCLE[8]),
    ("tab:cyan", DEFAULT_CYCLE[9]),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color `n` of the default cycle, wrapping around.
    pub fn cycle(n: usize) -> Self {
        DEFAULT_CYCLE[n % DEFAULT_CYCLE.len()]
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Effective opacity after applying an extra alpha multiplier.
    pub fn opacity(&self, alpha: f64) -> f64 {
        (self.a as f64 / 255.0) * alpha.clamp(0.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        DEFAULT_CYCLE[0]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}{:02x}", self.to_hex(), self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts named colors, `C0`..`C9`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();

        if let Some(hex) = key.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError(s.to_string()));
        }

        if let Some(n) = key.strip_prefix('c') {
            if let Ok(idx) = n.parse::<usize>() {
                return Ok(Color::cycle(idx));
            }
        }

        NAMED
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, c)| *c)
            .ok_or_else(|| ColorParseError(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(Color {
        r: byte(0)?,
        g: byte(2)?,
        b: byte(4)?,
        a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        assert_eq!("blue".parse::<Color>().unwrap(), Color::rgb(0, 0, 255));
        assert_eq!("Red".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("green".parse::<Color>().unwrap().to_hex(), "#008000");
    }

    #[test]
    fn test_parse_hex() {
        let c: Color = "#1f77b4".parse().unwrap();
        assert_eq!(c, DEFAULT_CYCLE[0]);
        let c: Color = "#ff000080".parse().unwrap();
        assert_eq!(c.a, 0x80);
        assert_eq!(c.to_string(), "#ff000080");
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn test_parse_cycle_reference() {
        assert_eq!("C1".parse::<Color>().unwrap(), DEFAULT_CYCLE[1]);
        assert_eq!("C12".parse::<Color>().unwrap(), DEFAULT_CYCLE[2]);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "chartreuse-ish".parse::<Color>().unwrap_err();
        assert_eq!(err, ColorParseError("chartreuse-ish".into()));
    }

    #[test]
    fn test_opacity() {
        let c = Color { a: 128, ..Color::rgb(0, 0, 0) };
        assert!((c.opacity(0.5) - 0.2509).abs() < 1e-3);
    }
}
