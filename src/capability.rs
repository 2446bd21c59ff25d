use std::fmt;

use crate::gpu::FbGpu;

/// Global name the capability table is published under
pub const CAPABILITY_NAME: &str = "framebuffer";

/// Value returned to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostValue {
    Nil,
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Nil => write!(f, "nil"),
            HostValue::Integer(n) => write!(f, "{}", n),
            HostValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Operations exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SetPalette,
    GetWidth,
    GetHeight,
    Put,
    IsReady,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::SetPalette,
        Operation::GetWidth,
        Operation::GetHeight,
        Operation::Put,
        Operation::IsReady,
    ];

    /// Name as seen by the host
    pub fn name(self) -> &'static str {
        match self {
            Operation::SetPalette => "setPalette",
            Operation::GetWidth => "getWidth",
            Operation::GetHeight => "getHeight",
            Operation::Put => "put",
            Operation::IsReady => "isReady",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Run the operation with host-supplied numeric arguments.
    ///
    /// Arguments follow scripting-host number conversion: missing arguments
    /// read as 0 and fractions truncate toward zero.
    pub fn invoke(self, gpu: &mut FbGpu, args: &[f64]) -> HostValue {
        let arg = |i: usize| args.get(i).copied().unwrap_or(0.0) as i64;
        match self {
            Operation::SetPalette => {
                gpu.set_palette(arg(0), arg(1));
                HostValue::Nil
            }
            Operation::GetWidth => HostValue::Integer(gpu.width() as i64),
            Operation::GetHeight => HostValue::Integer(gpu.height() as i64),
            Operation::Put => {
                gpu.put(arg(0), arg(1), arg(2), arg(3), arg(4));
                HostValue::Nil
            }
            Operation::IsReady => HostValue::Boolean(gpu.is_ready()),
        }
    }
}

/// Lookup of a name the table does not contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

/// Named set of operations handed to the host as one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    operations: Vec<Operation>,
}

impl CapabilityTable {
    /// The five framebuffer operations
    pub fn framebuffer() -> Self {
        Self {
            operations: Operation::ALL.to_vec(),
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operations.iter().map(|op| op.name())
    }

    /// Resolve `name` in this table and invoke it
    pub fn call(&self, gpu: &mut FbGpu, name: &str, args: &[f64]) -> Result<HostValue, UnknownOperation> {
        let op = Operation::from_name(name)
            .filter(|op| self.operations.contains(op))
            .ok_or_else(|| UnknownOperation(name.to_string()))?;
        Ok(op.invoke(gpu, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Font, MemoryDevice};

    fn gpu() -> FbGpu {
        let mut device = MemoryDevice::new(160, 64);
        FbGpu::start(&mut device, Font::empty()).unwrap()
    }

    #[test]
    fn test_table_has_exactly_five_names() {
        let names: Vec<_> = CapabilityTable::framebuffer().names().collect();
        assert_eq!(names, vec!["setPalette", "getWidth", "getHeight", "put", "isReady"]);
    }

    #[test]
    fn test_name_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name("clear"), None);
    }

    #[test]
    fn test_queries() {
        let mut gpu = gpu();
        let table = CapabilityTable::framebuffer();
        assert_eq!(table.call(&mut gpu, "getWidth", &[]), Ok(HostValue::Integer(20)));
        assert_eq!(table.call(&mut gpu, "getHeight", &[]), Ok(HostValue::Integer(4)));
        assert_eq!(table.call(&mut gpu, "isReady", &[]), Ok(HostValue::Boolean(false)));
    }

    #[test]
    fn test_set_palette_truncates_arguments() {
        let mut gpu = gpu();
        let table = CapabilityTable::framebuffer();
        let result = table.call(&mut gpu, "setPalette", &[3.9, 16777215.0]);
        assert_eq!(result, Ok(HostValue::Nil));
        assert_eq!(gpu.palette().get(3), 0xFFFFFF);
    }

    #[test]
    fn test_missing_arguments_read_as_zero() {
        let mut gpu = gpu();
        let table = CapabilityTable::framebuffer();
        table.call(&mut gpu, "setPalette", &[]).unwrap();
        assert_eq!(gpu.palette().get(0), 0);
    }

    #[test]
    fn test_unknown_operation() {
        let mut gpu = gpu();
        let err = CapabilityTable::framebuffer()
            .call(&mut gpu, "fill", &[])
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown operation 'fill'");
    }

    #[test]
    fn test_host_value_display() {
        assert_eq!(HostValue::Nil.to_string(), "nil");
        assert_eq!(HostValue::Integer(-4).to_string(), "-4");
        assert_eq!(HostValue::Boolean(true).to_string(), "true");
    }
}
