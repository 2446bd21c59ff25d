use super::geometry::PixelDepth;

/// Number of palette entries
pub const PALETTE_SIZE: usize = 256;

/// Pack 0xRRGGBB into 16 bits by masking the low bits of each channel.
///
/// Red keeps its low 5 bits, green its low 6, blue its low 5. This is a
/// truncation, not a down-scale: 0x00FF00 packs to 0x07E0 but 0x008000 packs
/// to 0x0000. Existing palettes depend on these exact values.
pub fn pack_rgb16(rgb: u32) -> u32 {
    let r = (rgb >> 16) & 0xFF;
    let g = (rgb >> 8) & 0xFF;
    let b = rgb & 0xFF;
    ((r & 0x1F) << 11) | ((g & 0x3F) << 5) | (b & 0x1F)
}

/// Indexed color table holding depth-encoded values
#[derive(Debug, Clone)]
pub struct Palette {
    depth: PixelDepth,
    entries: [u32; PALETTE_SIZE],
}

impl Palette {
    /// All-zero palette for the given depth
    pub fn new(depth: PixelDepth) -> Self {
        Self {
            depth,
            entries: [0; PALETTE_SIZE],
        }
    }

    /// Encode and store a color. Indices outside 0..=255 are ignored
    pub fn set(&mut self, index: i64, rgb: u32) {
        let Ok(index) = usize::try_from(index) else {
            return;
        };
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = match self.depth {
                PixelDepth::Bits32 => rgb,
                PixelDepth::Bits16 => pack_rgb16(rgb),
            };
        }
    }

    /// Encoded value at `index`
    pub fn get(&self, index: u8) -> u32 {
        self.entries[index as usize]
    }

    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    pub fn entries(&self) -> &[u32; PALETTE_SIZE] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_boundaries() {
        assert_eq!(pack_rgb16(0xFFFFFF), 0xFFFF);
        assert_eq!(pack_rgb16(0x000000), 0x0000);
        assert_eq!(pack_rgb16(0x00FF00), 0x07E0);
    }

    #[test]
    fn test_pack_truncates_instead_of_scaling() {
        // High bits are discarded: mid-grey collapses to black
        assert_eq!(pack_rgb16(0x808080), 0x0000);
        // Low bits survive
        assert_eq!(pack_rgb16(0x1F3F1F), 0xFFFF);
        assert_eq!(pack_rgb16(0x010101), (1 << 11) | (1 << 5) | 1);
    }

    #[test]
    fn test_set_32bit_stores_verbatim() {
        let mut palette = Palette::new(PixelDepth::Bits32);
        palette.set(7, 0x123456);
        assert_eq!(palette.get(7), 0x123456);
    }

    #[test]
    fn test_set_16bit_packs() {
        let mut palette = Palette::new(PixelDepth::Bits16);
        palette.set(255, 0xFFFFFF);
        assert_eq!(palette.get(255), 0xFFFF);
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let mut palette = Palette::new(PixelDepth::Bits32);
        palette.set(-1, 0xFFFFFF);
        palette.set(256, 0xFFFFFF);
        palette.set(i64::MAX, 0xFFFFFF);
        assert!(palette.entries().iter().all(|&e| e == 0));
    }

    #[test]
    fn test_overwrite_entry() {
        let mut palette = Palette::new(PixelDepth::Bits32);
        palette.set(3, 0xAAAAAA);
        palette.set(3, 0x555555);
        assert_eq!(palette.get(3), 0x555555);
    }
}
