//! Software inventory records and the findings derived from them.

use serde::{Deserialize, Serialize};

/// One row of the software inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoftwareInstallRecord {
    /// Hostname of the device the software is installed on. Not required to
    /// exist in the device inventory.
    pub hostname: String,

    /// Installed product name as reported by the inventory agent.
    pub name: String,

    /// Installed version string.
    pub version: String,
}

impl SoftwareInstallRecord {
    pub fn new(
        hostname: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

/// A flagged install: the record plus the denylist reason that matched it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoftwareFinding {
    pub hostname: String,
    pub software: String,
    pub version: String,
    /// Human-readable reason taken from the matching denylist entry.
    pub reason: String,
}

impl SoftwareFinding {
    /// Status annotation in the form used by the reports:
    /// `Incompatible - <reason> (Installed: <version>)`.
    pub fn status(&self) -> String {
        format!("Incompatible - {} (Installed: {})", self.reason, self.version)
    }

    /// One-line description: `<software> (v<version>) - <status>`.
    pub fn describe(&self) -> String {
        format!("{} (v{}) - {}", self.software, self.version, self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_describe_includes_version_and_reason() {
        let finding = SoftwareFinding {
            hostname: "PC-001".to_string(),
            software: "AutoCAD 2019".to_string(),
            version: "23.0".to_string(),
            reason: "Versions older than 2021 may have compatibility issues".to_string(),
        };

        assert_eq!(
            finding.describe(),
            "AutoCAD 2019 (v23.0) - Incompatible - Versions older than 2021 may have compatibility issues (Installed: 23.0)"
        );
    }
}
