//! Hardware compatibility verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hardware criterion that a device can fail.
///
/// Variant order is the order failures are reported in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Criterion {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "Firmware-Age")]
    FirmwareAge,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [Criterion::Cpu, Criterion::Ram, Criterion::FirmwareAge];

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Cpu => "CPU",
            Criterion::Ram => "RAM",
            Criterion::FirmwareAge => "Firmware-Age",
        }
    }

    /// Flag name used in the detailed verdict annotation.
    fn flag(&self) -> &'static str {
        match self {
            Criterion::Cpu => "CPU_OK",
            Criterion::Ram => "RAM_OK",
            Criterion::FirmwareAge => "BIOS_OK",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much detail a rendered verdict carries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStyle {
    /// `Not Compatible (CPU_OK: false, RAM_OK: true, BIOS_OK: true)`
    #[default]
    Detailed,
    /// `Not Compatible`
    Terse,
}

/// Outcome of evaluating one device's hardware against an upgrade policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompatibilityVerdict {
    /// Every criterion passed.
    Compatible,
    /// At least one criterion failed; `failed` lists them in [`Criterion`] order.
    Incompatible { failed: Vec<Criterion> },
    /// The CPU field was absent or `"nan"`; no other criterion is reported.
    MissingCpuData,
}

impl CompatibilityVerdict {
    /// Build a verdict from the failing criteria of a device with usable CPU data.
    pub fn from_failures(mut failed: Vec<Criterion>) -> Self {
        if failed.is_empty() {
            return CompatibilityVerdict::Compatible;
        }
        failed.sort();
        failed.dedup();
        CompatibilityVerdict::Incompatible { failed }
    }

    pub fn is_compatible(&self) -> bool {
        matches!(self, CompatibilityVerdict::Compatible)
    }

    /// Failed criteria. Empty for `Compatible` and `MissingCpuData`.
    pub fn failed_criteria(&self) -> &[Criterion] {
        match self {
            CompatibilityVerdict::Incompatible { failed } => failed,
            _ => &[],
        }
    }

    /// Render the verdict as the `Compatibility:` value used in reports.
    pub fn describe(&self, style: VerdictStyle) -> String {
        match (self, style) {
            (CompatibilityVerdict::Compatible, _) => "Compatible".to_string(),
            (CompatibilityVerdict::MissingCpuData, _) => {
                "Not Compatible (Missing CPU Data)".to_string()
            }
            (CompatibilityVerdict::Incompatible { .. }, VerdictStyle::Terse) => {
                "Not Compatible".to_string()
            }
            (CompatibilityVerdict::Incompatible { failed }, VerdictStyle::Detailed) => {
                let flags: Vec<String> = Criterion::ALL
                    .iter()
                    .map(|c| format!("{}: {}", c.flag(), !failed.contains(c)))
                    .collect();
                format!("Not Compatible ({})", flags.join(", "))
            }
        }
    }
}

impl fmt::Display for CompatibilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityVerdict::Compatible => f.write_str("Compatible"),
            CompatibilityVerdict::MissingCpuData => f.write_str("Incompatible [MissingCpuData]"),
            CompatibilityVerdict::Incompatible { failed } => {
                let names: Vec<&str> = failed.iter().map(Criterion::as_str).collect();
                write!(f, "Incompatible [{}]", names.join(", "))
            }
        }
    }
}
