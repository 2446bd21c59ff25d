use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

/// Bytes per glyph record in a binary font table
pub const GLYPH_RECORD_LEN: usize = 33;
/// Rows per glyph
pub const GLYPH_ROWS: usize = 16;
/// Number of addressable code points
pub const GLYPH_COUNT: usize = 0x10000;

/// One glyph as stored in a binary font table.
///
/// `width_class` is 0 (no glyph), 1 (8 px, one byte per row) or 2 (16 px,
/// two little-endian bytes per row).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphRecord {
    pub width_class: u8,
    pub rows: [u8; 32],
}

impl GlyphRecord {
    pub const EMPTY: Self = Self {
        width_class: 0,
        rows: [0; 32],
    };

    /// Build a narrow record from 16 row bytes
    pub fn narrow(rows: [u8; GLYPH_ROWS]) -> Self {
        let mut record = Self {
            width_class: 1,
            ..Self::EMPTY
        };
        record.rows[..GLYPH_ROWS].copy_from_slice(&rows);
        record
    }

    /// Build a wide record from 16 row words, bit 15 being the leftmost pixel
    pub fn wide(rows: [u16; GLYPH_ROWS]) -> Self {
        let mut record = Self {
            width_class: 2,
            ..Self::EMPTY
        };
        for (chunk, row) in record.rows.chunks_exact_mut(2).zip(rows) {
            chunk.copy_from_slice(&row.to_le_bytes());
        }
        record
    }

    /// Typed view of this record
    pub fn decode(&self) -> Glyph<'_> {
        match self.width_class {
            1 => Glyph::Narrow(&self.rows),
            2 => Glyph::Wide(&self.rows),
            _ => Glyph::Empty,
        }
    }
}

/// Decoded glyph shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph<'a> {
    /// Nothing is drawn
    Empty,
    /// 8 pixels wide
    Narrow(&'a [u8; 32]),
    /// 16 pixels wide
    Wide(&'a [u8; 32]),
}

impl Glyph<'_> {
    /// Width in pixels
    pub fn width(&self) -> usize {
        match self {
            Glyph::Empty => 0,
            Glyph::Narrow(_) => 8,
            Glyph::Wide(_) => 16,
        }
    }

    /// Bit pattern of row `py`
    pub fn row(&self, py: usize) -> RowBits {
        match self {
            Glyph::Empty => RowBits { bits: 0, width: 0 },
            Glyph::Narrow(rows) => RowBits {
                bits: rows[py] as u16,
                width: 8,
            },
            Glyph::Wide(rows) => RowBits {
                bits: u16::from_le_bytes([rows[py * 2], rows[py * 2 + 1]]),
                width: 16,
            },
        }
    }

    /// All rows top to bottom. Empty glyphs yield nothing
    pub fn rows(&self) -> impl Iterator<Item = RowBits> + '_ {
        let count = if matches!(self, Glyph::Empty) { 0 } else { GLYPH_ROWS };
        (0..count).map(move |py| self.row(py))
    }
}

/// One decoded glyph row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBits {
    pub bits: u16,
    pub width: u8,
}

impl RowBits {
    /// Pixels left to right: the most significant used bit is the leftmost pixel
    pub fn pixels(self) -> impl Iterator<Item = bool> {
        (0..self.width).rev().map(move |bit| (self.bits >> bit) & 1 == 1)
    }
}

/// Malformed font resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    /// Table length is not a whole number of records
    TruncatedRecord { len: usize },
    /// More records than addressable code points
    TooManyRecords { count: usize },
    /// Width class outside 0..=2
    InvalidWidthClass { code: usize, class: u8 },
    /// Unparseable `.hex` line
    Hex { line: usize, reason: &'static str },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::TruncatedRecord { len } => write!(
                f,
                "font table length {} is not a multiple of {}",
                len, GLYPH_RECORD_LEN
            ),
            FontError::TooManyRecords { count } => {
                write!(f, "font table has {} records, at most {} allowed", count, GLYPH_COUNT)
            }
            FontError::InvalidWidthClass { code, class } => {
                write!(f, "glyph U+{:04X} has invalid width class {}", code, class)
            }
            FontError::Hex { line, reason } => write!(f, "hex font line {}: {}", line, reason),
        }
    }
}

impl std::error::Error for FontError {}

/// Glyph table keyed by code point
#[derive(Debug, Clone)]
pub struct Font {
    records: Vec<GlyphRecord>,
}

impl Font {
    /// Font with no glyphs
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Parse a binary table of 33-byte records, record N describing code point N
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, FontError> {
        if bytes.len() % GLYPH_RECORD_LEN != 0 {
            return Err(FontError::TruncatedRecord { len: bytes.len() });
        }
        let count = bytes.len() / GLYPH_RECORD_LEN;
        if count > GLYPH_COUNT {
            return Err(FontError::TooManyRecords { count });
        }

        // Records are byte-aligned, so the cast only depends on length
        let records: &[GlyphRecord] = bytemuck::cast_slice(bytes);
        if let Some((code, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.width_class > 2)
        {
            return Err(FontError::InvalidWidthClass {
                code,
                class: record.width_class,
            });
        }

        Ok(Self {
            records: records.to_vec(),
        })
    }

    /// Parse GNU Unifont `.hex` text: `CODE:BITMAP` per line, 32 hex digits for
    /// an 8x16 glyph or 64 for a 16x16 glyph
    pub fn from_hex(text: &str) -> std::result::Result<Self, FontError> {
        let mut font = Self::empty();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let hex_error = |reason| FontError::Hex {
                line: index + 1,
                reason,
            };

            let (code, bitmap) = line.split_once(':').ok_or_else(|| hex_error("missing ':'"))?;
            if code.is_empty() || !code.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(hex_error("bad code point"));
            }
            let code = u32::from_str_radix(code, 16).map_err(|_| hex_error("bad code point"))?;
            let code = u16::try_from(code).map_err(|_| hex_error("code point above U+FFFF"))?;
            let bytes = decode_hex(bitmap).ok_or_else(|| hex_error("bad bitmap digits"))?;

            let record = match bytes.len() {
                16 => {
                    let mut rows = [0u8; GLYPH_ROWS];
                    rows.copy_from_slice(&bytes);
                    GlyphRecord::narrow(rows)
                }
                32 => {
                    let mut rows = [0u16; GLYPH_ROWS];
                    for (row, pair) in rows.iter_mut().zip(bytes.chunks_exact(2)) {
                        *row = u16::from_be_bytes([pair[0], pair[1]]);
                    }
                    GlyphRecord::wide(rows)
                }
                _ => return Err(hex_error("bitmap must be 32 or 64 digits")),
            };
            font.insert(code, record);
        }

        Ok(font)
    }

    /// Load a font file. `.hex` files are parsed as text, anything else as a binary table
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_hex = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("hex"));

        let font = if is_hex {
            let text = std::fs::read_to_string(path)
                .context(format!("Failed to read font file: {:?}", path))?;
            Self::from_hex(&text)
        } else {
            let bytes =
                std::fs::read(path).context(format!("Failed to read font file: {:?}", path))?;
            Self::from_bytes(&bytes)
        }
        .context(format!("Failed to parse font file: {:?}", path))?;

        log::info!("Loaded font {:?}: {} glyphs", path, font.glyph_count());
        Ok(font)
    }

    /// Set the record for one code point
    pub fn insert(&mut self, code: u16, record: GlyphRecord) {
        let index = code as usize;
        if index >= self.records.len() {
            self.records.resize(index + 1, GlyphRecord::EMPTY);
        }
        self.records[index] = record;
    }

    /// Glyph for a code point. Code points past the end of the table are empty
    pub fn glyph(&self, code: u16) -> Glyph<'_> {
        self.records
            .get(code as usize)
            .map_or(Glyph::Empty, GlyphRecord::decode)
    }

    /// Number of code points with a drawable glyph
    pub fn glyph_count(&self) -> usize {
        self.records.iter().filter(|r| r.width_class != 0).count()
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::empty()
    }
}

fn decode_hex(digits: &str) -> Option<Vec<u8>> {
    if digits.len() % 2 != 0 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}
