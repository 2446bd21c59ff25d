#[cfg(unix)]
use std::path::Path;

use log::{debug, info, warn};

use crate::capability::{CapabilityTable, CAPABILITY_NAME};
use crate::core::{CellRequest, DisplayGeometry, Font, Palette, PixelMemory, Rasterizer};
use crate::error::StartupError;
use crate::traits::{FramebufferDevice, Host, ScreenInfo};

/// Character-cell display engine over a mapped framebuffer.
///
/// Owns the pixel memory, palette and font for the lifetime of the process.
/// All mutation goes through `&mut self`, so only one caller can draw at a
/// time; share it across threads behind a mutex.
#[derive(Debug)]
pub struct FbGpu {
    rasterizer: Rasterizer,
    memory: PixelMemory,
    palette: Palette,
    font: Font,
    ready: bool,
}

impl FbGpu {
    /// Open a Linux framebuffer device and bring it up
    #[cfg(unix)]
    pub fn open(path: impl AsRef<Path>, font: Font) -> Result<Self, StartupError> {
        let path = path.as_ref();
        let mut device =
            crate::core::LinuxFramebuffer::open(path).map_err(|source| StartupError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::start(&mut device, font)
    }

    /// Query the device, negotiate a depth, and map pixel memory
    pub fn start<D: FramebufferDevice + ?Sized>(
        device: &mut D,
        font: Font,
    ) -> Result<Self, StartupError> {
        let fixed = device.fixed_info().map_err(StartupError::FixedInfo)?;
        debug!(
            "Framebuffer {:?}: {} bytes of memory, line length {}",
            fixed.id, fixed.smem_len, fixed.line_length
        );

        let screen = device.variable_info().map_err(StartupError::VariableInfo)?;
        let screen = negotiate_depth(device, screen)?;
        let geometry = DisplayGeometry::from_screen(&screen)
            .ok_or(StartupError::UnsupportedDepth(screen.bits_per_pixel))?;

        // The driver recomputes line length after a mode change
        match device.fixed_info() {
            Ok(settled)
                if settled.line_length != 0 && settled.line_length as usize != geometry.pitch =>
            {
                warn!(
                    "Driver line length {} differs from computed pitch {}",
                    settled.line_length, geometry.pitch
                );
            }
            Ok(_) => {}
            Err(e) => debug!("Fixed information unavailable after mode change: {}", e),
        }

        let len = geometry.mapped_len();
        let memory = device
            .map_pixels(len)
            .map_err(|source| StartupError::Map { len, source })?;

        info!(
            "Framebuffer ready: {}x{} at {} bpp, {}x{} cells",
            geometry.pixel_width,
            geometry.pixel_height,
            geometry.bits_per_pixel(),
            geometry.grid_cols,
            geometry.grid_rows
        );

        Ok(Self {
            rasterizer: Rasterizer::new(geometry),
            memory,
            palette: Palette::new(geometry.depth),
            font,
            // Cleared after a successful start; hosts read it through `isReady`
            ready: false,
        })
    }

    /// Publish the `framebuffer` capability table to the host
    pub fn publish(&self, host: &mut dyn Host) {
        host.publish(CAPABILITY_NAME, CapabilityTable::framebuffer());
    }

    /// Set palette entry `index` from a 0xRRGGBB value. Out-of-range indices are ignored
    pub fn set_palette(&mut self, index: i64, rgb: i64) {
        self.palette.set(index, rgb as u32);
    }

    /// Draw character `code` at cell (x, y) with palette colors `bg` and `fg`.
    /// Out-of-range arguments are ignored
    pub fn put(&mut self, x: i64, y: i64, bg: i64, fg: i64, code: i64) {
        let Some(request) = CellRequest::validate(self.rasterizer.geometry(), x, y, bg, fg, code)
        else {
            return;
        };
        let glyph = self.font.glyph(request.code);
        self.rasterizer
            .blit(&mut self.memory, &request, glyph, &self.palette);
    }

    /// Grid width in cells
    pub fn width(&self) -> u32 {
        self.rasterizer.geometry().grid_cols
    }

    /// Grid height in cells
    pub fn height(&self) -> u32 {
        self.rasterizer.geometry().grid_rows
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        self.rasterizer.geometry()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Raw pixel memory
    pub fn pixels(&self) -> &[u8] {
        &self.memory
    }
}

/// Ask for 32 bpp, fall back to 16 bpp
fn negotiate_depth<D: FramebufferDevice + ?Sized>(
    device: &mut D,
    screen: ScreenInfo,
) -> Result<ScreenInfo, StartupError> {
    let mut request = screen;
    request.bits_per_pixel = 32;
    match device.set_variable_info(&request) {
        Ok(settled) => Ok(settled),
        Err(depth32) => {
            warn!("32 bpp mode rejected ({}), trying 16 bpp", depth32);
            request.bits_per_pixel = 16;
            device
                .set_variable_info(&request)
                .map_err(|depth16| StartupError::DepthNegotiation { depth32, depth16 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FailPoint, MemoryDevice};

    #[test]
    fn test_start_prefers_32bpp() {
        let mut device = MemoryDevice::new(64, 32);
        let gpu = FbGpu::start(&mut device, Font::empty()).unwrap();
        assert_eq!(gpu.geometry().bits_per_pixel(), 32);
        assert_eq!(device.requested_depths(), &[32]);
    }

    #[test]
    fn test_start_falls_back_to_16bpp() {
        let mut device = MemoryDevice::new(64, 32).accepting(&[16]);
        let gpu = FbGpu::start(&mut device, Font::empty()).unwrap();
        assert_eq!(gpu.geometry().bits_per_pixel(), 16);
        assert_eq!(device.requested_depths(), &[32, 16]);
        assert_eq!(gpu.pixels().len(), 64 * 32 * 2);
    }

    #[test]
    fn test_start_fails_without_supported_depth() {
        let mut device = MemoryDevice::new(64, 32).accepting(&[8, 24]);
        let err = FbGpu::start(&mut device, Font::empty()).unwrap_err();
        assert!(matches!(err, StartupError::DepthNegotiation { .. }));
    }

    #[test]
    fn test_start_reports_map_failure() {
        let mut device = MemoryDevice::new(64, 32).failing_at(FailPoint::Map);
        let err = FbGpu::start(&mut device, Font::empty()).unwrap_err();
        assert!(matches!(err, StartupError::Map { len: 8192, .. }));
    }

    #[test]
    fn test_not_ready_after_start() {
        let mut device = MemoryDevice::new(64, 32);
        let gpu = FbGpu::start(&mut device, Font::empty()).unwrap();
        assert!(!gpu.is_ready());
    }
}
