use crate::capability::CapabilityTable;

/// Host scripting environment - receives named capability tables
pub trait Host {
    /// Publish a capability table under a global name
    fn publish(&mut self, name: &str, table: CapabilityTable);
}
