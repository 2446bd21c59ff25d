use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Device used when neither config nor CLI names one
pub const DEFAULT_DEVICE_PATH: &str = "/dev/fb0";

/// 16-color palette loaded into indices 0..16 at startup
pub const DEFAULT_PALETTE: [u32; 16] = [
    0x000000, 0x0000AA, 0x00AA00, 0x00AAAA, 0xAA0000, 0xAA00AA, 0xAA5500, 0xAAAAAA,
    0x555555, 0x5555FF, 0x55FF55, 0x55FFFF, 0xFF5555, 0xFF55FF, 0xFFFF55, 0xFFFFFF,
];

/// Palette color written either as a number or as "#RRGGBB" / "0xRRGGBB"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorValue", into = "u32")]
pub struct Rgb(pub u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Number(u32),
    Text(String),
}

impl TryFrom<ColorValue> for Rgb {
    type Error = String;

    fn try_from(value: ColorValue) -> std::result::Result<Self, Self::Error> {
        let rgb = match value {
            ColorValue::Number(n) => n,
            ColorValue::Text(s) => {
                let digits = s
                    .strip_prefix('#')
                    .or_else(|| s.strip_prefix("0x"))
                    .unwrap_or(&s);
                u32::from_str_radix(digits, 16).map_err(|_| format!("invalid color {:?}", s))?
            }
        };
        if rgb > 0xFFFFFF {
            return Err(format!("color {:#X} exceeds 24 bits", rgb));
        }
        Ok(Rgb(rgb))
    }
}

impl From<Rgb> for u32 {
    fn from(rgb: Rgb) -> Self {
        rgb.0
    }
}

/// Startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Framebuffer device node
    pub device: PathBuf,
    /// Font file, if any
    pub font: Option<PathBuf>,
    /// Colors for palette indices 0..n
    pub palette: Vec<Rgb>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE_PATH),
            font: None,
            palette: DEFAULT_PALETTE.iter().copied().map(Rgb).collect(),
        }
    }
}

impl Config {
    /// Parse a JSON config document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse config")
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let config =
            Self::from_json(&json).context(format!("Invalid config file: {:?}", path))?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(device) = &cli.device {
            self.device = device.clone();
        }
        if let Some(font) = &cli.font {
            self.font = Some(font.clone());
        }
        self
    }
}
