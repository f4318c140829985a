//! Error taxonomy for fleetcheck.
//!
//! Only input acquisition and policy loading can fail. Malformed hardware
//! fields never surface here; the evaluator degrades them to failing values.

use std::path::PathBuf;

/// Errors raised while loading an inventory table.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse delimited table {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to open spreadsheet {path:?}: {detail}")]
    Spreadsheet { path: PathBuf, detail: String },

    #[error("spreadsheet {path:?} has no sheets")]
    NoSheets { path: PathBuf },

    #[error("table {path:?} is missing an identifier column (expected one of: {expected})")]
    MissingIdentifierColumn { path: PathBuf, expected: String },

    #[error("unsupported table format for {path:?} (extension: {extension:?})")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// Errors raised while building or loading an upgrade policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("invalid CPU pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("policy must list at least one CPU pattern")]
    EmptyAllowlist,

    #[error("denylist entry {index} has an empty key")]
    EmptyDenylistKey { index: usize },

    #[error("failed to read policy file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize policy: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level fleetcheck errors.
#[derive(Debug, thiserror::Error)]
pub enum FleetcheckError {
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fleetcheck operations.
pub type Result<T> = std::result::Result<T, FleetcheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identifier_display() {
        let err = InventoryError::MissingIdentifierColumn {
            path: PathBuf::from("software.csv"),
            expected: "Hostname, Device Hostname".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("software.csv"));
        assert!(msg.contains("Device Hostname"));
    }

    #[test]
    fn test_policy_error_wraps_into_fleetcheck_error() {
        let err: FleetcheckError = PolicyError::EmptyAllowlist.into();
        assert!(err.to_string().contains("policy error"));
        assert!(err.to_string().contains("at least one CPU pattern"));
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = InventoryError::UnsupportedFormat {
            path: PathBuf::from("devices.pdf"),
            extension: "pdf".to_string(),
        };
        assert!(err.to_string().contains("unsupported table format"));
    }
}
