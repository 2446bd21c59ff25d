#[cfg(unix)]
pub mod fbdev;
pub mod geometry;
pub mod glyph;
pub mod memory_device;
pub mod palette;
pub mod pixel;
pub mod rasterizer;

#[cfg(unix)]
pub use fbdev::LinuxFramebuffer;
pub use geometry::{DisplayGeometry, PixelDepth, CELL_HEIGHT, CELL_WIDTH};
pub use glyph::{Font, FontError, Glyph, GlyphRecord, RowBits, GLYPH_COUNT, GLYPH_RECORD_LEN, GLYPH_ROWS};
pub use memory_device::{FailPoint, MemoryDevice};
pub use palette::{pack_rgb16, Palette, PALETTE_SIZE};
pub use pixel::{PixelMemory, RowWriter};
pub use rasterizer::{CellRequest, Rasterizer};
