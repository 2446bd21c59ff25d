use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use memmap2::MmapOptions;

use super::pixel::PixelMemory;
use crate::traits::{FixedScreenInfo, FramebufferDevice, ScreenInfo};

const FBIOGET_VSCREENINFO: u32 = 0x4600;
const FBIOPUT_VSCREENINFO: u32 = 0x4601;
const FBIOGET_FSCREENINFO: u32 = 0x4602;

/// `struct fb_bitfield` from `<linux/fb.h>`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, bytemuck::Zeroable)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// `struct fb_var_screeninfo` from `<linux/fb.h>`
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Zeroable)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// `struct fb_fix_screeninfo` from `<linux/fb.h>`
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Zeroable)]
struct FbFixScreeninfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    type_: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

impl FbVarScreeninfo {
    fn to_screen(&self) -> ScreenInfo {
        ScreenInfo {
            xres: self.xres,
            yres: self.yres,
            xres_virtual: self.xres_virtual,
            yres_virtual: self.yres_virtual,
            xoffset: self.xoffset,
            yoffset: self.yoffset,
            bits_per_pixel: self.bits_per_pixel,
        }
    }

    fn apply(&mut self, screen: &ScreenInfo) {
        self.xres = screen.xres;
        self.yres = screen.yres;
        self.xres_virtual = screen.xres_virtual;
        self.yres_virtual = screen.yres_virtual;
        self.xoffset = screen.xoffset;
        self.yoffset = screen.yoffset;
        self.bits_per_pixel = screen.bits_per_pixel;
    }
}

/// Linux fbdev device opened read/write
#[derive(Debug)]
pub struct LinuxFramebuffer {
    file: File,
    /// Last variable description seen, so mode requests keep the driver's timings
    var: FbVarScreeninfo,
}

impl LinuxFramebuffer {
    /// Open a framebuffer device node for reading and writing
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self {
            file,
            var: bytemuck::Zeroable::zeroed(),
        })
    }

    fn ioctl<T>(&self, request: u32, arg: &mut T) -> io::Result<()> {
        // SAFETY: `arg` is a live, exclusively borrowed repr(C) struct matching
        // the layout the kernel expects for `request`.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg as *mut T) };
        if rc == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

impl FramebufferDevice for LinuxFramebuffer {
    fn fixed_info(&mut self) -> io::Result<FixedScreenInfo> {
        let mut fix: FbFixScreeninfo = bytemuck::Zeroable::zeroed();
        self.ioctl(FBIOGET_FSCREENINFO, &mut fix)?;

        let id_len = fix.id.iter().position(|&b| b == 0).unwrap_or(fix.id.len());
        Ok(FixedScreenInfo {
            id: String::from_utf8_lossy(&fix.id[..id_len]).into_owned(),
            smem_len: fix.smem_len,
            line_length: fix.line_length,
        })
    }

    fn variable_info(&mut self) -> io::Result<ScreenInfo> {
        let mut var: FbVarScreeninfo = bytemuck::Zeroable::zeroed();
        self.ioctl(FBIOGET_VSCREENINFO, &mut var)?;
        self.var = var;
        Ok(var.to_screen())
    }

    fn set_variable_info(&mut self, request: &ScreenInfo) -> io::Result<ScreenInfo> {
        let mut var = self.var;
        var.apply(request);
        // The driver writes back the mode it actually chose
        self.ioctl(FBIOPUT_VSCREENINFO, &mut var)?;
        self.var = var;
        Ok(var.to_screen())
    }

    fn map_pixels(&mut self, len: usize) -> io::Result<PixelMemory> {
        // SAFETY: the mapping is device memory owned by this process for its
        // lifetime; nothing else in the process maps or truncates it.
        let map = unsafe { MmapOptions::new().len(len).map_mut(&self.file)? };
        Ok(PixelMemory::Mapped(map))
    }
}
