use std::fmt;
use std::io;
use std::path::PathBuf;

/// Unrecoverable failure while bringing up the framebuffer.
///
/// There is no retry path: callers are expected to report the error and exit.
#[derive(Debug)]
pub enum StartupError {
    /// The device node could not be opened read/write
    Open { path: PathBuf, source: io::Error },
    /// Fixed screen description query failed
    FixedInfo(io::Error),
    /// Variable screen description query failed
    VariableInfo(io::Error),
    /// Neither 32 nor 16 bits per pixel was accepted
    DepthNegotiation { depth32: io::Error, depth16: io::Error },
    /// The device accepted the request but settled on a depth we cannot drive
    UnsupportedDepth(u32),
    /// Pixel memory could not be mapped
    Map { len: usize, source: io::Error },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Open { path, source } => {
                write!(f, "cannot open framebuffer device {}: {}", path.display(), source)
            }
            StartupError::FixedInfo(e) => write!(f, "error reading fixed information: {}", e),
            StartupError::VariableInfo(e) => write!(f, "error reading variable information: {}", e),
            StartupError::DepthNegotiation { depth32, depth16 } => write!(
                f,
                "error setting 32 or 16 bpp mode (32: {}, 16: {})",
                depth32, depth16
            ),
            StartupError::UnsupportedDepth(bits) => {
                write!(f, "device settled on unsupported depth of {} bpp", bits)
            }
            StartupError::Map { len, source } => write!(
                f,
                "failed to map {} bytes of framebuffer memory: {}",
                len, source
            ),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Open { source, .. } | StartupError::Map { source, .. } => Some(source),
            StartupError::FixedInfo(e) | StartupError::VariableInfo(e) => Some(e),
            StartupError::DepthNegotiation { depth16, .. } => Some(depth16),
            StartupError::UnsupportedDepth(_) => None,
        }
    }
}
