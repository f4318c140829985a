//! Upgrade policy: hardware thresholds, CPU allowlist and software denylist.
//!
//! [`PolicyConfig`] is the serializable form (TOML on disk). [`UpgradePolicy`]
//! is the compiled form the evaluator and scanner consume. Both tables are
//! ordered; the denylist order decides which reason wins when several keys
//! match one install.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::domain::error::PolicyError;

/// Display name of the built-in upgrade target.
pub const WINDOWS_11_TARGET: &str = "Windows 11";

/// Minimum usable memory for Windows 11, in GB.
pub const WINDOWS_11_MIN_RAM_GB: f64 = 4.0;

/// Earliest firmware release year treated as TPM 2.0 capable.
pub const WINDOWS_11_MIN_FIRMWARE_YEAR: i32 = 2018;

/// Known-good CPU families for Windows 11. Anything else is denied.
pub const WINDOWS_11_CPU_PATTERNS: &[&str] = &[
    r"i[3579]-[89]\d{2}",
    r"i[3579]-10\d{2}",
    r"i[3579]-11\d{2}",
    r"i[3579]-12\d{2}",
    r"Ryzen [3579] \d{3,4}",
    r"Ryzen PRO",
];

/// Software known to cause trouble on Windows 11, as `(key, reason)`.
pub const WINDOWS_11_DENYLIST: &[(&str, &str)] = &[
    ("Adobe Flash Player", "Discontinued, security risk"),
    ("Internet Explorer", "No longer supported on Windows 11"),
    ("McAfee Endpoint Security", "Conflicts with Windows 11 security"),
    (
        "Symantec Endpoint Protection",
        "Legacy security software, not compatible",
    ),
    ("Trend Micro OfficeScan", "Known performance issues"),
    ("VMware Workstation", "Versions older than 15 may not work"),
    (
        "AutoCAD",
        "Versions older than 2021 may have compatibility issues",
    ),
    ("Lexmark Printer Software", "Legacy drivers may not function"),
    ("HP Printer Drivers", "Pre-2018 drivers may not be compatible"),
];

// ---------------------------------------------------------------------------
// Serializable configuration
// ---------------------------------------------------------------------------

/// A denylist entry: installs whose name contains `key` (case-insensitive)
/// are flagged with `reason`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DenylistEntry {
    pub key: String,
    pub reason: String,
}

impl DenylistEntry {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// On-disk policy. Omitted fields take the Windows 11 defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Name of the upgrade target, used in report titles.
    pub target: String,

    /// Minimum usable RAM in GB.
    pub min_ram_gb: f64,

    /// Minimum firmware release year.
    pub min_firmware_year: i32,

    /// Case-insensitive regex patterns searched anywhere in the CPU string.
    pub cpu_patterns: Vec<String>,

    /// Ordered denylist; first match wins.
    pub denylist: Vec<DenylistEntry>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            target: WINDOWS_11_TARGET.to_string(),
            min_ram_gb: WINDOWS_11_MIN_RAM_GB,
            min_firmware_year: WINDOWS_11_MIN_FIRMWARE_YEAR,
            cpu_patterns: WINDOWS_11_CPU_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            denylist: WINDOWS_11_DENYLIST
                .iter()
                .map(|(key, reason)| DenylistEntry::new(*key, *reason))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Compiled tables
// ---------------------------------------------------------------------------

/// Compiled CPU allowlist.
#[derive(Debug, Clone)]
pub struct CpuAllowlist {
    patterns: Vec<String>,
    compiled: Vec<Regex>,
}

impl CpuAllowlist {
    /// Compile `patterns` case-insensitively. Fails on the first invalid pattern.
    pub fn new<I, S>(patterns: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            return Err(PolicyError::EmptyAllowlist);
        }

        let compiled = patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| PolicyError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns, compiled })
    }

    /// The first pattern found anywhere in `cpu`, if any.
    pub fn matching_pattern(&self, cpu: &str) -> Option<&str> {
        self.compiled
            .iter()
            .zip(&self.patterns)
            .find(|(re, _)| re.is_match(cpu))
            .map(|(_, pattern)| pattern.as_str())
    }

    pub fn is_allowed(&self, cpu: &str) -> bool {
        self.matching_pattern(cpu).is_some()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Ordered software denylist with pre-lowercased keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    entries: Vec<DenylistEntry>,
    lowered: Vec<String>,
}

impl Denylist {
    pub fn new(entries: Vec<DenylistEntry>) -> Result<Self, PolicyError> {
        if let Some(index) = entries.iter().position(|e| e.key.trim().is_empty()) {
            return Err(PolicyError::EmptyDenylistKey { index });
        }
        let lowered = entries.iter().map(|e| e.key.to_lowercase()).collect();
        Ok(Self { entries, lowered })
    }

    /// First entry (in table order) whose key occurs in `software_name`,
    /// ignoring case.
    pub fn first_match(&self, software_name: &str) -> Option<&DenylistEntry> {
        let name = software_name.to_lowercase();
        self.lowered
            .iter()
            .position(|key| name.contains(key.as_str()))
            .map(|idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[DenylistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Compiled upgrade policy.
#[derive(Debug, Clone)]
pub struct UpgradePolicy {
    pub target: String,
    pub min_ram_gb: f64,
    pub min_firmware_year: i32,
    pub cpu_allowlist: CpuAllowlist,
    pub denylist: Denylist,
}

impl UpgradePolicy {
    /// Built-in Windows 11 policy.
    pub fn windows_11() -> Self {
        Self::from_config(PolicyConfig::default())
            .expect("built-in Windows 11 policy tables are valid")
    }

    /// Compile a [`PolicyConfig`].
    pub fn from_config(config: PolicyConfig) -> Result<Self, PolicyError> {
        Ok(Self {
            target: config.target,
            min_ram_gb: config.min_ram_gb,
            min_firmware_year: config.min_firmware_year,
            cpu_allowlist: CpuAllowlist::new(config.cpu_patterns)?,
            denylist: Denylist::new(config.denylist)?,
        })
    }

    /// Parse and compile a TOML policy document.
    pub fn from_toml_str(raw: &str) -> Result<Self, PolicyError> {
        let config: PolicyConfig = toml::from_str(raw)?;
        Self::from_config(config)
    }

    /// Read and compile a TOML policy file.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Serializable form of this policy.
    pub fn to_config(&self) -> PolicyConfig {
        PolicyConfig {
            target: self.target.clone(),
            min_ram_gb: self.min_ram_gb,
            min_firmware_year: self.min_firmware_year,
            cpu_patterns: self.cpu_allowlist.patterns().to_vec(),
            denylist: self.denylist.entries().to_vec(),
        }
    }

    /// Render as a TOML document that [`UpgradePolicy::from_toml_str`] accepts.
    pub fn to_toml_string(&self) -> Result<String, PolicyError> {
        Ok(toml::to_string_pretty(&self.to_config())?)
    }

    /// Override the RAM threshold (builder pattern).
    pub fn with_min_ram_gb(mut self, min_ram_gb: f64) -> Self {
        self.min_ram_gb = min_ram_gb;
        self
    }

    /// Override the firmware year threshold.
    pub fn with_min_firmware_year(mut self, year: i32) -> Self {
        self.min_firmware_year = year;
        self
    }

    /// Replace the denylist.
    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    /// Replace the CPU allowlist.
    pub fn with_cpu_allowlist(mut self, allowlist: CpuAllowlist) -> Self {
        self.cpu_allowlist = allowlist;
        self
    }
}

impl Default for UpgradePolicy {
    fn default() -> Self {
        Self::windows_11()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_policy_compiles() {
        let policy = UpgradePolicy::windows_11();
        assert_eq!(policy.target, "Windows 11");
        assert_eq!(policy.min_ram_gb, 4.0);
        assert_eq!(policy.min_firmware_year, 2018);
        assert_eq!(policy.cpu_allowlist.patterns().len(), 6);
        assert_eq!(policy.denylist.len(), 9);
    }

    #[test]
    fn allowlist_is_case_insensitive() {
        let allowlist = CpuAllowlist::new(["Ryzen PRO"]).expect("compile");
        assert!(allowlist.is_allowed("amd ryzen pro 4750g"));
        assert!(!allowlist.is_allowed("AMD Athlon"));
    }

    #[test]
    fn allowlist_reports_matching_pattern() {
        let allowlist =
            CpuAllowlist::new(WINDOWS_11_CPU_PATTERNS.iter().copied()).expect("compile");
        assert_eq!(
            allowlist.matching_pattern("Intel(R) Core(TM) i5-10310U CPU @ 1.70GHz"),
            Some(r"i[3579]-10\d{2}")
        );
    }

    #[test]
    fn allowlist_rejects_invalid_pattern() {
        let err = CpuAllowlist::new(["i[3579"]).expect_err("should fail");
        assert!(matches!(err, PolicyError::InvalidPattern { .. }));
    }

    #[test]
    fn allowlist_rejects_empty() {
        let err = CpuAllowlist::new(Vec::<String>::new()).expect_err("should fail");
        assert!(matches!(err, PolicyError::EmptyAllowlist));
    }

    #[test]
    fn denylist_first_match_wins() {
        let denylist = Denylist::new(vec![
            DenylistEntry::new("Endpoint", "generic"),
            DenylistEntry::new("McAfee Endpoint Security", "specific"),
        ])
        .expect("valid");
        let hit = denylist
            .first_match("McAfee Endpoint Security 10.7")
            .expect("match");
        assert_eq!(hit.reason, "generic");
    }

    #[test]
    fn denylist_rejects_blank_key() {
        let err = Denylist::new(vec![
            DenylistEntry::new("AutoCAD", "old"),
            DenylistEntry::new("  ", "blank"),
        ])
        .expect_err("should fail");
        assert!(matches!(err, PolicyError::EmptyDenylistKey { index: 1 }));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let policy = UpgradePolicy::from_toml_str("min_ram_gb = 8\n").expect("parse");
        assert_eq!(policy.min_ram_gb, 8.0);
        assert_eq!(policy.min_firmware_year, WINDOWS_11_MIN_FIRMWARE_YEAR);
        assert_eq!(policy.denylist.len(), WINDOWS_11_DENYLIST.len());
    }

    #[test]
    fn toml_rendering_reloads_to_same_config() {
        let policy = UpgradePolicy::windows_11().with_min_firmware_year(2019);
        let rendered = policy.to_toml_string().expect("render");
        let reloaded = UpgradePolicy::from_toml_str(&rendered).expect("reload");
        assert_eq!(reloaded.to_config(), policy.to_config());
    }

    #[test]
    fn toml_with_bad_pattern_is_policy_error() {
        let err = UpgradePolicy::from_toml_str("cpu_patterns = [\"(unclosed\"]\n")
            .expect_err("should fail");
        assert!(matches!(err, PolicyError::InvalidPattern { .. }));
    }
}
