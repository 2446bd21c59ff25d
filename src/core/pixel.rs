use std::ops::{Deref, DerefMut};

use memmap2::MmapMut;

use super::geometry::PixelDepth;
use super::glyph::RowBits;

/// Backing store for the pixel buffer
pub enum PixelMemory {
    /// Shared mapping of device memory
    Mapped(MmapMut),
    /// Heap buffer, for devices without real memory
    Heap(Vec<u8>),
}

impl Deref for PixelMemory {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            PixelMemory::Mapped(map) => map,
            PixelMemory::Heap(bytes) => bytes,
        }
    }
}

impl DerefMut for PixelMemory {
    fn deref_mut(&mut self) -> &mut [u8] {
        match self {
            PixelMemory::Mapped(map) => map,
            PixelMemory::Heap(bytes) => bytes,
        }
    }
}

impl std::fmt::Debug for PixelMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            PixelMemory::Mapped(_) => "Mapped",
            PixelMemory::Heap(_) => "Heap",
        };
        f.debug_struct("PixelMemory")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}

/// Pixel-width store into a byte slice
trait PixelWord {
    const SIZE: usize;

    fn store(dst: &mut [u8], value: u32);
}

impl PixelWord for u16 {
    const SIZE: usize = 2;

    fn store(dst: &mut [u8], value: u32) {
        dst.copy_from_slice(&(value as u16).to_ne_bytes());
    }
}

impl PixelWord for u32 {
    const SIZE: usize = 4;

    fn store(dst: &mut [u8], value: u32) {
        dst.copy_from_slice(&value.to_ne_bytes());
    }
}

/// Writes one glyph row starting at the first byte of `dst`:
/// `fg` for set bits, `bg` for clear bits
pub type RowWriter = fn(dst: &mut [u8], row: RowBits, fg: u32, bg: u32);

fn write_row<W: PixelWord>(dst: &mut [u8], row: RowBits, fg: u32, bg: u32) {
    for (column, lit) in row.pixels().enumerate() {
        let start = column * W::SIZE;
        // Geometry is trusted; a pixel that would leave the mapping is dropped
        if let Some(pixel) = dst.get_mut(start..start + W::SIZE) {
            W::store(pixel, if lit { fg } else { bg });
        }
    }
}

impl PixelDepth {
    /// Row writer for this depth, chosen once at initialization
    pub fn row_writer(self) -> RowWriter {
        match self {
            PixelDepth::Bits16 => write_row::<u16>,
            PixelDepth::Bits32 => write_row::<u32>,
        }
    }
}
