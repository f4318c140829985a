//! Domain models for fleetcheck.
//!
//! Canonical definitions for the core entities:
//! - `DeviceRecord`: one row of the device inventory
//! - `SoftwareInstallRecord`: one row of the software inventory
//! - `CompatibilityVerdict`: hardware outcome for a device
//! - `SoftwareFinding`: a flagged install

pub mod device;
pub mod error;
pub mod software;
pub mod verdict;

pub use device::DeviceRecord;
pub use error::{FleetcheckError, InventoryError, PolicyError, Result};
pub use software::{SoftwareFinding, SoftwareInstallRecord};
pub use verdict::{CompatibilityVerdict, Criterion, VerdictStyle};
