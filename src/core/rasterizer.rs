use super::geometry::{DisplayGeometry, CELL_HEIGHT, CELL_WIDTH};
use super::glyph::Glyph;
use super::palette::{Palette, PALETTE_SIZE};
use super::pixel::RowWriter;

/// A validated `put` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRequest {
    pub col: u32,
    pub row: u32,
    pub bg: u8,
    pub fg: u8,
    pub code: u16,
}

impl CellRequest {
    /// Validate raw host arguments against the grid.
    /// Returns `None` when any argument is out of range
    pub fn validate(
        geometry: &DisplayGeometry,
        x: i64,
        y: i64,
        bg: i64,
        fg: i64,
        code: i64,
    ) -> Option<Self> {
        if !geometry.contains_cell(x, y) {
            return None;
        }
        let palette_range = 0..PALETTE_SIZE as i64;
        if !palette_range.contains(&bg) || !palette_range.contains(&fg) {
            return None;
        }
        Some(Self {
            col: x as u32,
            row: y as u32,
            bg: bg as u8,
            fg: fg as u8,
            code: u16::try_from(code).ok()?,
        })
    }
}

/// Blits glyphs into a pixel buffer with fixed geometry and pixel writer
#[derive(Clone, Copy)]
pub struct Rasterizer {
    geometry: DisplayGeometry,
    writer: RowWriter,
}

impl Rasterizer {
    pub fn new(geometry: DisplayGeometry) -> Self {
        Self {
            geometry,
            writer: geometry.depth.row_writer(),
        }
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    /// Draw `glyph` into the cell named by `request`. Empty glyphs draw nothing
    pub fn blit(&self, buffer: &mut [u8], request: &CellRequest, glyph: Glyph<'_>, palette: &Palette) {
        let fg = palette.get(request.fg);
        let bg = palette.get(request.bg);
        let x = request.col * CELL_WIDTH;
        let y = request.row * CELL_HEIGHT;

        for (py, row) in glyph.rows().enumerate() {
            let base = self.geometry.pixel_offset(x, y + py as u32);
            if let Some(dst) = buffer.get_mut(base..) {
                (self.writer)(dst, row, fg, bg);
            }
        }
    }
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("geometry", &self.geometry)
            .finish()
    }
}
