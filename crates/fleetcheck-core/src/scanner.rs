//! Software risk scanner.
//!
//! Matches every install against the ordered [`Denylist`] and groups the
//! flagged installs by hostname. At most one finding is produced per install:
//! the first denylist entry whose key occurs in the software name wins.

use std::collections::HashMap;

use crate::domain::software::{SoftwareFinding, SoftwareInstallRecord};
use crate::policy::Denylist;

/// Flagged installs grouped by hostname.
///
/// Hostnames iterate in first-seen order and each hostname's findings keep
/// the order their installs appeared in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoftwareScan {
    devices: Vec<(String, Vec<SoftwareFinding>)>,
    index: HashMap<String, usize>,
    installs_scanned: usize,
}

impl SoftwareScan {
    fn push(&mut self, finding: SoftwareFinding) {
        match self.index.get(&finding.hostname) {
            Some(&idx) => self.devices[idx].1.push(finding),
            None => {
                self.index
                    .insert(finding.hostname.clone(), self.devices.len());
                self.devices.push((finding.hostname.clone(), vec![finding]));
            }
        }
    }

    /// Findings for `hostname`; empty when nothing was flagged.
    pub fn findings_for(&self, hostname: &str) -> &[SoftwareFinding] {
        self.index
            .get(hostname)
            .map(|&idx| self.devices[idx].1.as_slice())
            .unwrap_or(&[])
    }

    /// `(hostname, findings)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SoftwareFinding])> {
        self.devices
            .iter()
            .map(|(host, findings)| (host.as_str(), findings.as_slice()))
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.index.contains_key(hostname)
    }

    /// Number of hostnames with at least one finding.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Total findings across all hostnames.
    pub fn finding_count(&self) -> usize {
        self.devices.iter().map(|(_, f)| f.len()).sum()
    }

    /// Number of install records examined, flagged or not.
    pub fn installs_scanned(&self) -> usize {
        self.installs_scanned
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Scan `installs` against `denylist`.
pub fn scan(installs: &[SoftwareInstallRecord], denylist: &Denylist) -> SoftwareScan {
    let mut result = SoftwareScan::default();

    for install in installs {
        result.installs_scanned += 1;
        if let Some(entry) = denylist.first_match(&install.name) {
            result.push(SoftwareFinding {
                hostname: install.hostname.clone(),
                software: install.name.clone(),
                version: install.version.clone(),
                reason: entry.reason.clone(),
            });
        }
    }

    result
}
