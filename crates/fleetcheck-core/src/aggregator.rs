//! Per-device finding aggregation.
//!
//! Joins hardware verdicts and software findings on hostname and keeps only
//! the devices that have something to report.
//!
//! Ordering: devices with a hardware problem come first, in verdict order;
//! devices whose only problems are software installs follow, in the order the
//! scanner first saw them. A hostname is emitted at most once.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::software::SoftwareFinding;
use crate::domain::verdict::CompatibilityVerdict;
use crate::scanner::SoftwareScan;

/// A hostname and the hardware verdict computed for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceVerdict {
    pub hostname: String,
    pub verdict: CompatibilityVerdict,
}

/// Everything reportable about one device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceFindingSet {
    pub hostname: String,
    /// Present only when the hardware verdict is not `Compatible`.
    pub hardware: Option<CompatibilityVerdict>,
    /// Flagged installs, in input order.
    pub software: Vec<SoftwareFinding>,
}

impl DeviceFindingSet {
    pub fn has_hardware_issue(&self) -> bool {
        self.hardware.is_some()
    }

    pub fn has_software_issue(&self) -> bool {
        !self.software.is_empty()
    }

    /// Number of individual problems: one for a failing verdict plus one per install.
    pub fn issue_count(&self) -> usize {
        usize::from(self.has_hardware_issue()) + self.software.len()
    }
}

/// Combine `verdicts` and `software` into finding sets for problem devices.
///
/// If `verdicts` lists a hostname more than once, the first entry is used.
pub fn aggregate(verdicts: &[DeviceVerdict], software: &SoftwareScan) -> Vec<DeviceFindingSet> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut sets = Vec::new();

    for entry in verdicts {
        if !seen.insert(entry.hostname.as_str()) {
            continue;
        }
        if entry.verdict.is_compatible() {
            continue;
        }
        emitted.insert(entry.hostname.as_str());
        sets.push(DeviceFindingSet {
            hostname: entry.hostname.clone(),
            hardware: Some(entry.verdict.clone()),
            software: software.findings_for(&entry.hostname).to_vec(),
        });
    }

    // Compatible hardware with flagged software, and hosts absent from the
    // device table, land here.
    for (hostname, findings) in software.iter() {
        if !emitted.insert(hostname) {
            continue;
        }
        sets.push(DeviceFindingSet {
            hostname: hostname.to_string(),
            hardware: None,
            software: findings.to_vec(),
        });
    }

    sets
}
