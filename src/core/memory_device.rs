use std::io;

use super::pixel::PixelMemory;
use crate::traits::{FixedScreenInfo, FramebufferDevice, ScreenInfo};

/// Device step that a [`MemoryDevice`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    FixedInfo,
    VariableInfo,
    Map,
}

/// Framebuffer device backed by heap memory.
///
/// Accepts only the depths it is configured with and records every depth
/// requested, so mode negotiation can be observed without hardware.
#[derive(Debug, Clone)]
pub struct MemoryDevice {
    screen: ScreenInfo,
    accepted_depths: Vec<u32>,
    fill: u8,
    fail: Option<FailPoint>,
    requests: Vec<u32>,
    settle: Option<fn(&mut ScreenInfo)>,
}

impl MemoryDevice {
    /// Device with the given resolution, currently at 8 bpp, accepting 16 and 32
    pub fn new(xres: u32, yres: u32) -> Self {
        Self {
            screen: ScreenInfo {
                xres,
                yres,
                xres_virtual: xres,
                yres_virtual: yres,
                xoffset: 0,
                yoffset: 0,
                bits_per_pixel: 8,
            },
            accepted_depths: vec![16, 32],
            fill: 0,
            fail: None,
            requests: Vec::new(),
            settle: None,
        }
    }

    /// Set the virtual resolution
    pub fn with_virtual(mut self, xres_virtual: u32, yres_virtual: u32) -> Self {
        self.screen.xres_virtual = xres_virtual;
        self.screen.yres_virtual = yres_virtual;
        self
    }

    /// Set the panning offset
    pub fn with_offset(mut self, xoffset: u32, yoffset: u32) -> Self {
        self.screen.xoffset = xoffset;
        self.screen.yoffset = yoffset;
        self
    }

    /// Depths the device will accept in a mode change
    pub fn accepting(mut self, depths: &[u32]) -> Self {
        self.accepted_depths = depths.to_vec();
        self
    }

    /// Byte value the mapped memory starts out with
    pub fn filled_with(mut self, fill: u8) -> Self {
        self.fill = fill;
        self
    }

    /// Make one step fail with an I/O error
    pub fn failing_at(mut self, point: FailPoint) -> Self {
        self.fail = Some(point);
        self
    }

    /// Adjust every accepted mode request before it takes effect,
    /// the way a driver rounds a request to something it supports
    pub fn adjusting(mut self, settle: fn(&mut ScreenInfo)) -> Self {
        self.settle = Some(settle);
        self
    }

    /// Depths requested so far, in order
    pub fn requested_depths(&self) -> &[u32] {
        &self.requests
    }

    /// Current mode
    pub fn screen(&self) -> &ScreenInfo {
        &self.screen
    }

    fn check(&self, point: FailPoint) -> io::Result<()> {
        if self.fail == Some(point) {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("simulated {:?} failure", point),
            ))
        } else {
            Ok(())
        }
    }
}

impl FramebufferDevice for MemoryDevice {
    fn fixed_info(&mut self) -> io::Result<FixedScreenInfo> {
        self.check(FailPoint::FixedInfo)?;
        let bytes = (self.screen.bits_per_pixel / 8).max(1);
        Ok(FixedScreenInfo {
            id: "memory".to_string(),
            smem_len: self.screen.xres_virtual * self.screen.yres_virtual * 4,
            line_length: self.screen.xres_virtual * bytes,
        })
    }

    fn variable_info(&mut self) -> io::Result<ScreenInfo> {
        self.check(FailPoint::VariableInfo)?;
        Ok(self.screen)
    }

    fn set_variable_info(&mut self, request: &ScreenInfo) -> io::Result<ScreenInfo> {
        self.requests.push(request.bits_per_pixel);
        if !self.accepted_depths.contains(&request.bits_per_pixel) {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }
        self.screen = *request;
        if let Some(settle) = self.settle {
            settle(&mut self.screen);
        }
        Ok(self.screen)
    }

    fn map_pixels(&mut self, len: usize) -> io::Result<PixelMemory> {
        self.check(FailPoint::Map)?;
        Ok(PixelMemory::Heap(vec![self.fill; len]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unaccepted_depth() {
        let mut device = MemoryDevice::new(64, 32).accepting(&[16]);
        let mut request = *device.screen();
        request.bits_per_pixel = 32;

        assert!(device.set_variable_info(&request).is_err());
        assert_eq!(device.screen().bits_per_pixel, 8);

        request.bits_per_pixel = 16;
        assert_eq!(device.set_variable_info(&request).unwrap().bits_per_pixel, 16);
        assert_eq!(device.requested_depths(), &[32, 16]);
    }

    #[test]
    fn test_map_fills_memory() {
        let mut device = MemoryDevice::new(8, 16).filled_with(0x5A);
        let memory = device.map_pixels(12).unwrap();
        assert_eq!(&memory[..], &[0x5A; 12]);
    }

    #[test]
    fn test_adjusting_changes_settled_mode() {
        let mut device = MemoryDevice::new(64, 32).adjusting(|s| s.bits_per_pixel = 24);
        let mut request = *device.screen();
        request.bits_per_pixel = 32;

        assert_eq!(device.set_variable_info(&request).unwrap().bits_per_pixel, 24);
        assert_eq!(device.screen().bits_per_pixel, 24);
    }

    #[test]
    fn test_fail_point() {
        let mut device = MemoryDevice::new(8, 16).failing_at(FailPoint::VariableInfo);
        assert!(device.fixed_info().is_ok());
        assert!(device.variable_info().is_err());
    }
}
