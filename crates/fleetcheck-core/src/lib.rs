//! fleetcheck core library
//!
//! Decides whether inventoried PCs and their installed software are ready for
//! an operating system upgrade. Re-exports the evaluator, scanner, aggregator
//! and the I/O helpers used by the `fleetcheck` binary.

pub mod aggregator;
pub mod audit;
pub mod domain;
pub mod evaluator;
pub mod inventory;
pub mod metrics;
pub mod obs;
pub mod parse;
pub mod policy;
pub mod reporting;
pub mod scanner;
pub mod telemetry;

pub use domain::{
    CompatibilityVerdict, Criterion, DeviceRecord, FleetcheckError, InventoryError, PolicyError,
    Result, SoftwareFinding, SoftwareInstallRecord, VerdictStyle,
};

pub use aggregator::{aggregate, DeviceFindingSet, DeviceVerdict};
pub use audit::{run_audit, AuditOutcome, AuditSummary};
pub use evaluator::{evaluate, evaluate_device};
pub use inventory::{
    digest_file, load_devices, load_software, load_table, Cell, Table, UNKNOWN_VERSION,
};
pub use parse::{first_numeric_token, leading_year};
pub use policy::{CpuAllowlist, Denylist, DenylistEntry, PolicyConfig, UpgradePolicy};
pub use reporting::{
    render_full_report, render_incompatible_listing, write_findings_json, write_text_report,
    FindingsArtifact, InputArtifact, ReportFiles, FINDINGS_JSON_FILE, FULL_REPORT_FILE,
    INCOMPATIBLE_LISTING_FILE,
};
pub use scanner::{scan, SoftwareScan};

pub use metrics::METRICS;
pub use obs::{
    emit_audit_finished, emit_audit_started, emit_report_written, emit_scan_completed, AuditSpan,
};
pub use telemetry::init_tracing;

/// fleetcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
