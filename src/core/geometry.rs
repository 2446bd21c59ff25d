use crate::traits::ScreenInfo;

/// Character cell width in pixels
pub const CELL_WIDTH: u32 = 8;
/// Character cell height in pixels
pub const CELL_HEIGHT: u32 = 16;

/// Pixel encodings the engine can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelDepth {
    /// 16 bits per pixel, 5/6/5 packed
    Bits16,
    /// 32 bits per pixel, raw 0xRRGGBB
    Bits32,
}

impl PixelDepth {
    /// Depth for a bits-per-pixel value, if supported
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            16 => Some(Self::Bits16),
            32 => Some(Self::Bits32),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
        }
    }

    pub fn bytes(self) -> usize {
        (self.bits() >> 3) as usize
    }
}

/// Negotiated addressing for the mapped pixel buffer.
///
/// Built once after mode negotiation and never changed afterwards. All pixel
/// writes go through [`DisplayGeometry::pixel_offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub depth: PixelDepth,
    /// Bytes per scanline of the virtual screen
    pub pitch: usize,
    pub x_offset: u32,
    pub y_offset: u32,
    pub grid_cols: u32,
    pub grid_rows: u32,
}

impl DisplayGeometry {
    /// Derive geometry from a negotiated mode. `None` if the depth is not 16 or 32
    pub fn from_screen(info: &ScreenInfo) -> Option<Self> {
        let depth = PixelDepth::from_bits(info.bits_per_pixel)?;
        Some(Self {
            pixel_width: info.xres,
            pixel_height: info.yres,
            depth,
            pitch: info.xres_virtual as usize * depth.bytes(),
            x_offset: info.xoffset,
            y_offset: info.yoffset,
            grid_cols: info.xres / CELL_WIDTH,
            grid_rows: info.yres / CELL_HEIGHT,
        })
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.depth.bits()
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.depth.bytes()
    }

    /// Size of the pixel region to map
    pub fn mapped_len(&self) -> usize {
        self.pixel_width as usize * self.pixel_height as usize * self.bits_per_pixel() as usize / 8
    }

    /// Byte offset of pixel (x, y) in the mapped buffer
    pub fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (self.y_offset as usize + y as usize) * self.pitch
            + (self.x_offset as usize + x as usize) * self.bytes_per_pixel()
    }

    /// Whether a cell coordinate lies on the grid
    pub fn contains_cell(&self, col: i64, row: i64) -> bool {
        (0..self.grid_cols as i64).contains(&col) && (0..self.grid_rows as i64).contains(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(xres: u32, yres: u32, bpp: u32) -> ScreenInfo {
        ScreenInfo {
            xres,
            yres,
            xres_virtual: xres,
            yres_virtual: yres,
            xoffset: 0,
            yoffset: 0,
            bits_per_pixel: bpp,
        }
    }

    #[test]
    fn test_depth_from_bits() {
        assert_eq!(PixelDepth::from_bits(16), Some(PixelDepth::Bits16));
        assert_eq!(PixelDepth::from_bits(32), Some(PixelDepth::Bits32));
        assert_eq!(PixelDepth::from_bits(24), None);
        assert_eq!(PixelDepth::from_bits(8), None);
    }

    #[test]
    fn test_depth_bytes() {
        assert_eq!(PixelDepth::Bits16.bytes(), 2);
        assert_eq!(PixelDepth::Bits32.bytes(), 4);
    }

    #[test]
    fn test_grid_from_resolution() {
        let geometry = DisplayGeometry::from_screen(&screen(1024, 768, 32)).unwrap();
        assert_eq!(geometry.grid_cols, 128);
        assert_eq!(geometry.grid_rows, 48);
        assert_eq!(geometry.grid_cols * CELL_WIDTH, geometry.pixel_width);
        assert_eq!(geometry.grid_rows * CELL_HEIGHT, geometry.pixel_height);
    }

    #[test]
    fn test_partial_cells_are_dropped() {
        let geometry = DisplayGeometry::from_screen(&screen(1366, 770, 16)).unwrap();
        assert_eq!(geometry.grid_cols, 170);
        assert_eq!(geometry.grid_rows, 48);
    }

    #[test]
    fn test_pitch_uses_virtual_width() {
        let mut info = screen(640, 480, 16);
        info.xres_virtual = 800;
        let geometry = DisplayGeometry::from_screen(&info).unwrap();
        assert_eq!(geometry.pitch, 1600);
    }

    #[test]
    fn test_pixel_offset_with_panning() {
        let mut info = screen(640, 480, 32);
        info.xres_virtual = 1024;
        info.xoffset = 3;
        info.yoffset = 2;
        let geometry = DisplayGeometry::from_screen(&info).unwrap();

        assert_eq!(geometry.pixel_offset(0, 0), 2 * 4096 + 3 * 4);
        assert_eq!(geometry.pixel_offset(8, 16), 18 * 4096 + 11 * 4);
    }

    #[test]
    fn test_mapped_len() {
        let geometry = DisplayGeometry::from_screen(&screen(800, 600, 16)).unwrap();
        assert_eq!(geometry.mapped_len(), 800 * 600 * 2);
    }

    #[test]
    fn test_unsupported_depth_rejected() {
        assert!(DisplayGeometry::from_screen(&screen(800, 600, 24)).is_none());
    }

    #[test]
    fn test_contains_cell_bounds() {
        let geometry = DisplayGeometry::from_screen(&screen(80, 32, 32)).unwrap();
        assert!(geometry.contains_cell(0, 0));
        assert!(geometry.contains_cell(9, 1));
        assert!(!geometry.contains_cell(10, 0));
        assert!(!geometry.contains_cell(0, 2));
        assert!(!geometry.contains_cell(-1, 0));
        assert!(!geometry.contains_cell(0, -1));
    }
}
