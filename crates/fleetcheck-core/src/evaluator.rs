//! Hardware compatibility evaluator.
//!
//! Evaluates one device's CPU, RAM and firmware fields against an
//! [`UpgradePolicy`] to produce a [`CompatibilityVerdict`]. Every criterion is
//! checked and every failure reported, except when the CPU field is unusable:
//! that short-circuits to [`CompatibilityVerdict::MissingCpuData`].

use tracing::debug;

use crate::domain::device::DeviceRecord;
use crate::domain::verdict::{CompatibilityVerdict, Criterion};
use crate::parse::{first_numeric_token, leading_year};
use crate::policy::UpgradePolicy;

/// Evaluate raw hardware fields against `policy`.
///
/// Total: malformed input degrades to a failing criterion, never an error.
pub fn evaluate(
    policy: &UpgradePolicy,
    cpu: Option<&str>,
    ram: Option<&str>,
    bios_released: Option<&str>,
) -> CompatibilityVerdict {
    let Some(cpu) = cpu.filter(|c| !c.eq_ignore_ascii_case("nan")) else {
        return CompatibilityVerdict::MissingCpuData;
    };

    let failed: Vec<Criterion> = Criterion::ALL
        .into_iter()
        .filter(|criterion| !check_criterion(*criterion, policy, cpu, ram, bios_released))
        .collect();

    CompatibilityVerdict::from_failures(failed)
}

/// Evaluate a [`DeviceRecord`] against `policy`.
pub fn evaluate_device(policy: &UpgradePolicy, device: &DeviceRecord) -> CompatibilityVerdict {
    let verdict = evaluate(
        policy,
        device.cpu.as_deref(),
        device.ram.as_deref(),
        device.bios_released.as_deref(),
    );
    debug!(
        event = "device.evaluated",
        hostname = %device.hostname,
        verdict = %verdict,
    );
    verdict
}

fn check_criterion(
    criterion: Criterion,
    policy: &UpgradePolicy,
    cpu: &str,
    ram: Option<&str>,
    bios_released: Option<&str>,
) -> bool {
    match criterion {
        Criterion::Cpu => policy.cpu_allowlist.is_allowed(cpu),
        Criterion::Ram => first_numeric_token(ram) >= policy.min_ram_gb,
        Criterion::FirmwareAge => leading_year(bios_released) >= policy.min_firmware_year,
    }
}
