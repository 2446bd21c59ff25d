use std::io;

use crate::core::PixelMemory;

/// Variable screen description - the part of the mode a client may change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenInfo {
    /// Visible resolution in pixels
    pub xres: u32,
    pub yres: u32,
    /// Virtual resolution in pixels
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    /// Offset of the visible area inside the virtual one
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
}

/// Fixed screen description - reported by the hardware, read-only
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixedScreenInfo {
    /// Driver identification string
    pub id: String,
    /// Length of device pixel memory in bytes
    pub smem_len: u32,
    /// Bytes per scanline as reported by the driver
    pub line_length: u32,
}

/// Display device - geometry queries, mode negotiation and pixel memory
pub trait FramebufferDevice {
    /// Read the fixed screen description
    fn fixed_info(&mut self) -> io::Result<FixedScreenInfo>;

    /// Read the current variable screen description
    fn variable_info(&mut self) -> io::Result<ScreenInfo>;

    /// Request a mode change.
    /// Returns the mode the device settled on, which may be adjusted from the request
    fn set_variable_info(&mut self, request: &ScreenInfo) -> io::Result<ScreenInfo>;

    /// Map `len` bytes of pixel memory, shared and writable, from the pixel origin
    fn map_pixels(&mut self, len: usize) -> io::Result<PixelMemory>;
}
