//! Device inventory records.

use serde::{Deserialize, Serialize};

/// One row of the device inventory.
///
/// Hardware fields are kept exactly as they appear in the source table. The
/// evaluator reads them through the lossy parsers in [`crate::parse`] and never
/// rewrites them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Hostname; the join key into the software inventory.
    pub hostname: String,

    /// CPU model string (`Device CPU`). `None` when the cell is empty.
    pub cpu: Option<String>,

    /// Usable memory descriptor (`Memory (Usable)`), e.g. `"15.7 GB"`.
    pub ram: Option<String>,

    /// Firmware release date (`BIOS Released`), expected to start with a year.
    pub bios_released: Option<String>,
}

impl DeviceRecord {
    /// Create a record with only a hostname set.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            cpu: None,
            ram: None,
            bios_released: None,
        }
    }

    pub fn with_cpu(mut self, cpu: impl Into<String>) -> Self {
        self.cpu = Some(cpu.into());
        self
    }

    pub fn with_ram(mut self, ram: impl Into<String>) -> Self {
        self.ram = Some(ram.into());
        self
    }

    pub fn with_bios_released(mut self, date: impl Into<String>) -> Self {
        self.bios_released = Some(date.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let device = DeviceRecord::new("PC-001")
            .with_cpu("Intel Core i5-8500")
            .with_ram("8 GB")
            .with_bios_released("2019-02-11");

        assert_eq!(device.hostname, "PC-001");
        assert_eq!(device.cpu.as_deref(), Some("Intel Core i5-8500"));
        assert_eq!(device.ram.as_deref(), Some("8 GB"));
        assert_eq!(device.bios_released.as_deref(), Some("2019-02-11"));
    }

    #[test]
    fn new_leaves_hardware_fields_empty() {
        let device = DeviceRecord::new("PC-002");
        assert!(device.cpu.is_none());
        assert!(device.ram.is_none());
        assert!(device.bios_released.is_none());
    }
}
