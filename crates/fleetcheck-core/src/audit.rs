//! End-to-end audit over in-memory inventory tables.
//!
//! [`run_audit`] evaluates every device row, scans every install, aggregates
//! the results and records metrics. It performs no I/O, so identical inputs
//! always yield identical outcomes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::aggregator::{aggregate, DeviceFindingSet, DeviceVerdict};
use crate::domain::device::DeviceRecord;
use crate::domain::software::SoftwareInstallRecord;
use crate::domain::verdict::CompatibilityVerdict;
use crate::evaluator::evaluate_device;
use crate::metrics::METRICS;
use crate::obs::{
    emit_audit_finished, emit_audit_started, emit_duplicate_device, emit_scan_completed,
};
use crate::policy::UpgradePolicy;
use crate::scanner::{scan, SoftwareScan};

/// Headline counts for one audit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditSummary {
    /// Device rows evaluated.
    pub devices: usize,
    /// Rows whose hardware verdict is `Compatible`.
    pub compatible: usize,
    /// Rows failing at least one hardware criterion (including missing CPU data).
    pub incompatible: usize,
    /// Rows whose CPU field was unusable.
    pub missing_cpu_data: usize,
    /// Install rows examined.
    pub installs_scanned: usize,
    /// Flagged installs.
    pub software_findings: usize,
    /// Devices in the aggregated finding list.
    pub devices_with_findings: usize,
    /// Hostnames with flagged software but no device row.
    pub unknown_hosts: usize,
}

/// Everything produced by one audit.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    /// One verdict per device row, in table order.
    pub verdicts: Vec<DeviceVerdict>,
    /// Flagged installs grouped by hostname.
    pub software: SoftwareScan,
    /// Problem devices, hardware problems first.
    pub finding_sets: Vec<DeviceFindingSet>,
    pub summary: AuditSummary,
}

impl AuditOutcome {
    /// Verdict for the first device row with `hostname`.
    pub fn verdict_for(&self, hostname: &str) -> Option<&CompatibilityVerdict> {
        self.verdicts
            .iter()
            .find(|v| v.hostname == hostname)
            .map(|v| &v.verdict)
    }
}

/// Run the full audit.
pub fn run_audit(
    devices: &[DeviceRecord],
    installs: &[SoftwareInstallRecord],
    policy: &UpgradePolicy,
) -> AuditOutcome {
    emit_audit_started(devices.len(), installs.len());

    let mut known: HashSet<&str> = HashSet::with_capacity(devices.len());
    let mut verdicts = Vec::with_capacity(devices.len());
    for device in devices {
        if !known.insert(device.hostname.as_str()) {
            emit_duplicate_device(&device.hostname);
        }
        verdicts.push(DeviceVerdict {
            hostname: device.hostname.clone(),
            verdict: evaluate_device(policy, device),
        });
    }
    METRICS.add_devices_evaluated(devices.len() as u64);

    let software = scan(installs, &policy.denylist);
    METRICS.add_installs_scanned(software.installs_scanned() as u64);
    METRICS.add_findings(software.finding_count() as u64);
    emit_scan_completed(
        software.installs_scanned(),
        software.device_count(),
        software.finding_count(),
    );

    let finding_sets = aggregate(&verdicts, &software);

    let summary = AuditSummary {
        devices: verdicts.len(),
        compatible: verdicts.iter().filter(|v| v.verdict.is_compatible()).count(),
        incompatible: verdicts.iter().filter(|v| !v.verdict.is_compatible()).count(),
        missing_cpu_data: verdicts
            .iter()
            .filter(|v| v.verdict == CompatibilityVerdict::MissingCpuData)
            .count(),
        installs_scanned: software.installs_scanned(),
        software_findings: software.finding_count(),
        devices_with_findings: finding_sets.len(),
        unknown_hosts: software
            .iter()
            .filter(|(host, _)| !known.contains(host))
            .count(),
    };

    emit_audit_finished(summary.devices, summary.incompatible, summary.devices_with_findings);

    AuditOutcome {
        verdicts,
        software,
        finding_sets,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::verdict::Criterion;

    #[test]
    fn summary_counts_each_category() {
        let devices = vec![
            DeviceRecord::new("OK")
                .with_cpu("i5-10210U")
                .with_ram("8 GB")
                .with_bios_released("2020-03-01"),
            DeviceRecord::new("OLD")
                .with_cpu("Core 2 Duo")
                .with_ram("2 GB")
                .with_bios_released("2009-01-01"),
            DeviceRecord::new("NOCPU"),
        ];
        let installs = vec![
            SoftwareInstallRecord::new("OK", "Adobe Flash Player 32 NPAPI", "32.0"),
            SoftwareInstallRecord::new("GHOST", "Internet Explorer", "11"),
            SoftwareInstallRecord::new("OK", "7-Zip", "23.01"),
        ];

        let outcome = run_audit(&devices, &installs, &UpgradePolicy::windows_11());
        let s = &outcome.summary;
        assert_eq!(s.devices, 3);
        assert_eq!(s.compatible, 1);
        assert_eq!(s.incompatible, 2);
        assert_eq!(s.missing_cpu_data, 1);
        assert_eq!(s.installs_scanned, 3);
        assert_eq!(s.software_findings, 2);
        assert_eq!(s.devices_with_findings, 4);
        assert_eq!(s.unknown_hosts, 1);

        assert_eq!(
            outcome.verdict_for("OLD").map(|v| v.failed_criteria().to_vec()),
            Some(vec![Criterion::Cpu, Criterion::Ram, Criterion::FirmwareAge])
        );
    }

    #[test]
    fn duplicate_rows_keep_first_verdict_in_findings() {
        let devices = vec![
            DeviceRecord::new("DUP").with_cpu("nan"),
            DeviceRecord::new("DUP")
                .with_cpu("i7-9700")
                .with_ram("16 GB")
                .with_bios_released("2020-01-01"),
        ];
        let outcome = run_audit(&devices, &[], &UpgradePolicy::windows_11());
        assert_eq!(outcome.verdicts.len(), 2);
        assert_eq!(outcome.finding_sets.len(), 1);
        assert_eq!(
            outcome.finding_sets[0].hardware,
            Some(CompatibilityVerdict::MissingCpuData)
        );
    }
}
