pub mod capability;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod gpu;
pub mod script;
pub mod traits;

pub use capability::{CapabilityTable, HostValue, Operation, CAPABILITY_NAME};
pub use error::StartupError;
pub use gpu::FbGpu;
