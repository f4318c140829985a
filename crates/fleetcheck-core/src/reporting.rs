//! Report rendering and artifact writing.
//!
//! Provides three output artifacts:
//! - the full compatibility report (every device, then software issues)
//! - the incompatible-computers listing (problem devices only)
//! - `FindingsArtifact`, a machine-readable JSON view of the same findings
//!
//! Rendering is pure; the `write_*` helpers only add file I/O.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::aggregator::DeviceFindingSet;
use crate::audit::{AuditOutcome, AuditSummary};
use crate::domain::device::DeviceRecord;
use crate::domain::verdict::VerdictStyle;
use crate::policy::PolicyConfig;

/// File name of the full report for the built-in Windows 11 policy.
pub const FULL_REPORT_FILE: &str = "windows_11_compatibility_report.txt";
/// File name of the incompatible-computers listing for the built-in policy.
pub const INCOMPATIBLE_LISTING_FILE: &str = "windows_11_incompatible_computers.txt";
/// File name of the JSON findings artifact for the built-in policy.
pub const FINDINGS_JSON_FILE: &str = "windows_11_findings.json";

/// Version of the [`FindingsArtifact`] layout.
pub const FINDINGS_SCHEMA_VERSION: &str = "1.0";

/// Output file names for one upgrade target, prefixed with a slug of the
/// target name (`"Windows 11"` -> `windows_11_*`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub full_report: String,
    pub incompatible_listing: String,
    pub findings_json: String,
}

impl ReportFiles {
    pub fn for_target(target: &str) -> Self {
        let prefix = file_prefix(target);
        Self {
            full_report: format!("{prefix}_compatibility_report.txt"),
            incompatible_listing: format!("{prefix}_incompatible_computers.txt"),
            findings_json: format!("{prefix}_findings.json"),
        }
    }
}

/// Lowercase ASCII alphanumerics; every other run collapses to one `_`.
fn file_prefix(target: &str) -> String {
    let mut prefix = String::with_capacity(target.len());
    for ch in target.chars() {
        if ch.is_ascii_alphanumeric() {
            prefix.push(ch.to_ascii_lowercase());
        } else if !prefix.is_empty() && !prefix.ends_with('_') {
            prefix.push('_');
        }
    }
    let trimmed = prefix.trim_end_matches('_');
    if trimmed.is_empty() {
        "upgrade".to_string()
    } else {
        trimmed.to_string()
    }
}

const RULE_WIDTH: usize = 60;
const UNKNOWN: &str = "Unknown";

fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

// ── full report ───────────────────────────────────────────────────────────

/// Render the full report.
///
/// Every device row is listed with its raw hardware fields and verdict,
/// followed by the flagged software grouped per hostname. `devices` must be the
/// slice `outcome` was computed from.
pub fn render_full_report(
    target: &str,
    devices: &[DeviceRecord],
    outcome: &AuditOutcome,
    style: VerdictStyle,
) -> String {
    debug_assert_eq!(
        devices.len(),
        outcome.verdicts.len(),
        "device rows and verdicts must line up"
    );

    let mut out = String::new();
    out.push_str(&format!("{} Compatibility Report\n", target));
    out.push_str(&heavy_rule());
    out.push_str("\n\n");

    out.push_str("PC Compatibility:\n");
    out.push_str(&light_rule());
    out.push('\n');
    for (device, entry) in devices.iter().zip(&outcome.verdicts) {
        out.push_str(&format!("Hostname: {}\n", device.hostname));
        out.push_str(&format!("CPU: {}\n", device.cpu.as_deref().unwrap_or(UNKNOWN)));
        out.push_str(&format!("RAM: {}\n", device.ram.as_deref().unwrap_or(UNKNOWN)));
        out.push_str(&format!(
            "BIOS Release Date: {}\n",
            device.bios_released.as_deref().unwrap_or(UNKNOWN)
        ));
        out.push_str(&format!("Compatibility: {}\n", entry.verdict.describe(style)));

        let flagged = outcome.software.findings_for(&device.hostname);
        if !flagged.is_empty() {
            let names: Vec<&str> = flagged.iter().map(|f| f.software.as_str()).collect();
            out.push_str(&format!(" - Incompatible Software: {}\n", names.join(", ")));
        }
        out.push_str(&light_rule());
        out.push('\n');
    }

    out.push_str("\nSoftware Compatibility Issues:\n");
    out.push_str(&light_rule());
    out.push('\n');
    if outcome.software.is_empty() {
        out.push_str("No incompatible software detected.\n");
    } else {
        for (hostname, findings) in outcome.software.iter() {
            out.push_str(&format!("\nDevice: {}\n", hostname));
            for finding in findings {
                out.push_str(&format!(" - {}\n", finding.describe()));
            }
        }
    }

    out
}

// ── incompatible listing ──────────────────────────────────────────────────

/// Render the condensed listing of problem devices.
pub fn render_incompatible_listing(sets: &[DeviceFindingSet], style: VerdictStyle) -> String {
    let mut out = String::new();
    out.push_str("List of Incompatible Computers\n");
    out.push_str(&heavy_rule());
    out.push_str("\n\n");

    if sets.is_empty() {
        out.push_str("No incompatible computers found.\n");
        return out;
    }

    for set in sets {
        out.push_str(&format!("Hostname: {}\n", set.hostname));
        if let Some(verdict) = &set.hardware {
            out.push_str(&format!(
                " - Hardware Requirements - {}\n",
                verdict.describe(style)
            ));
        }
        for finding in &set.software {
            out.push_str(&format!(" - Software Requirements - {}\n", finding.describe()));
        }
        out.push('\n');
    }
    out
}

// ── findings JSON ─────────────────────────────────────────────────────────

/// Identity of one input table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputArtifact {
    pub path: String,
    pub sha256: String,
}

/// Machine-readable findings written next to the text reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FindingsArtifact {
    pub schema_version: String,
    pub devices_input: InputArtifact,
    pub software_input: InputArtifact,
    pub policy: PolicyConfig,
    pub summary: AuditSummary,
    pub finding_sets: Vec<DeviceFindingSet>,
}

impl FindingsArtifact {
    pub fn new(
        devices_input: InputArtifact,
        software_input: InputArtifact,
        policy: PolicyConfig,
        outcome: &AuditOutcome,
    ) -> Self {
        Self {
            schema_version: FINDINGS_SCHEMA_VERSION.to_string(),
            devices_input,
            software_input,
            policy,
            summary: outcome.summary.clone(),
            finding_sets: outcome.finding_sets.clone(),
        }
    }
}

/// Write a rendered text report.
pub fn write_text_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Write the findings artifact as pretty JSON.
pub fn write_findings_json(path: &Path, artifact: &FindingsArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize findings artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
