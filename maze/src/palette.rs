use std::{fmt::Display, fs, path::Path, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MazeError;

/// An 8-bit RGBA color
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
    pub const BLACK: Rgba = Rgba([0x00, 0x00, 0x00, 0xFF]);
    pub const RED: Rgba = Rgba([0xFF, 0x00, 0x00, 0xFF]);
    pub const GREEN: Rgba = Rgba([0x00, 0xFF, 0x00, 0xFF]);
    pub const BLUE: Rgba = Rgba([0x00, 0x00, 0xFF, 0xFF]);
    pub const PINK: Rgba = Rgba([0xF9, 0x60, 0x87, 0xFF]);
    pub const MINT: Rgba = Rgba([0xCC, 0xFF, 0x99, 0xFF]);
    pub const TEAL: Rgba = Rgba([0x33, 0xD5, 0xCC, 0xFF]);
}

impl Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

/// Parses `RRGGBBAA` or `RRGGBB` (opaque), with an optional leading `#`
impl FromStr for Rgba {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(anyhow::anyhow!("Invalid color: {}", s));
        }

        let mut channels = [0xFF; 4];
        for (i, channel) in channels.iter_mut().enumerate().take(hex.len() / 2) {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| anyhow::anyhow!("Invalid color: {}", s))?;
        }
        Ok(Rgba(channels))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The ordered color table of an indexed image. Holds at most 256 entries so every position fits
/// in a `u8`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Palette(Vec<Rgba>);

impl Palette {
    pub fn new(colors: Vec<Rgba>) -> Result<Self, MazeError> {
        if colors.len() > 256 {
            return Err(MazeError::TooManyColors {
                count: colors.len(),
            });
        }
        Ok(Self(colors))
    }

    /// Position of the exact match for `color`, if any
    pub fn index_of(&self, color: Rgba) -> Option<u8> {
        self.0
            .iter()
            .position(|&c| c == color)
            .map(|i| i as u8)
    }

    pub fn get(&self, index: u8) -> Option<Rgba> {
        self.0.get(index as usize).copied()
    }

    /// Appends `color` and returns its index
    pub fn push(&mut self, color: Rgba) -> Result<u8, MazeError> {
        if self.0.len() >= 256 {
            return Err(MazeError::PaletteFull { color });
        }
        self.0.push(color);
        Ok((self.0.len() - 1) as u8)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.0
    }
}

/// The colors a maze image is drawn and painted with. Fields missing from a color scheme file
/// keep their default.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticColors {
    /// open cells
    pub white: Rgba,
    /// walls
    pub black: Rgba,
    /// the solved path
    pub red: Rgba,
    /// start marker
    pub green: Rgba,
    /// end marker
    pub blue: Rgba,
    pub pink: Rgba,
    /// dead ends, and the second route color
    pub mint: Rgba,
    pub teal: Rgba,
}

impl Default for SemanticColors {
    fn default() -> Self {
        Self {
            white: Rgba::WHITE,
            black: Rgba::BLACK,
            red: Rgba::RED,
            green: Rgba::GREEN,
            blue: Rgba::BLUE,
            pink: Rgba::PINK,
            mint: Rgba::MINT,
            teal: Rgba::TEAL,
        }
    }
}

impl SemanticColors {
    /// Reads a color scheme from a JSON object such as `{"red": "FF8800FF"}`
    pub fn from_json_file(path: &Path) -> Result<Self, MazeError> {
        let text = fs::read_to_string(path).map_err(|source| MazeError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| MazeError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}
