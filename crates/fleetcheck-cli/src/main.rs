//! fleetcheck - Windows 11 upgrade readiness CLI
//!
//! The `fleetcheck` command reads a device inventory and a software inventory
//! and reports which PCs cannot take the upgrade, and why.
//!
//! ## Commands
//!
//! - `report`: Evaluate both inventories and write the text (and JSON) reports
//! - `check`: Evaluate a single device from command-line values
//! - `policy`: Print the effective upgrade policy as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use fleetcheck_core::{
    digest_file, emit_report_written, evaluate, load_devices, load_software,
    render_full_report, render_incompatible_listing, run_audit, write_findings_json,
    write_text_report, AuditSpan, FindingsArtifact, InputArtifact, ReportFiles, UpgradePolicy,
    VerdictStyle, METRICS,
};

#[derive(Parser)]
#[command(name = "fleetcheck")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upgrade readiness for device and software inventories", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Policy file (TOML); the built-in Windows 11 policy is used when omitted
    #[arg(long, global = true, env = "FLEETCHECK_POLICY")]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate both inventories and write the compatibility reports
    Report {
        /// Device inventory (.xlsx/.xls/.ods first sheet, or .csv)
        #[arg(short, long, env = "FLEETCHECK_DEVICES")]
        devices: PathBuf,

        /// Software inventory (.csv)
        #[arg(short, long, env = "FLEETCHECK_SOFTWARE")]
        software: PathBuf,

        /// Directory the reports are written to
        #[arg(short, long, default_value = ".", env = "FLEETCHECK_OUT_DIR")]
        out_dir: PathBuf,

        /// How much detail hardware verdicts carry
        #[arg(long, value_enum, default_value_t = StyleArg::Detailed)]
        style: StyleArg,

        /// Also write the machine-readable findings artifact
        #[arg(long)]
        json_report: bool,
    },

    /// Evaluate a single device's hardware fields
    Check {
        /// CPU model string
        #[arg(long)]
        cpu: Option<String>,

        /// Usable memory descriptor, e.g. "8 GB"
        #[arg(long)]
        ram: Option<String>,

        /// Firmware release date, e.g. "2019-05-01"
        #[arg(long)]
        bios: Option<String>,
    },

    /// Print the effective policy as TOML
    Policy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    Detailed,
    Terse,
}

impl From<StyleArg> for VerdictStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Detailed => VerdictStyle::Detailed,
            StyleArg::Terse => VerdictStyle::Terse,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    fleetcheck_core::init_tracing(cli.json, level);

    let policy = load_policy(cli.policy.as_deref())?;

    match cli.command {
        Commands::Report {
            devices,
            software,
            out_dir,
            style,
            json_report,
        } => cmd_report(
            &policy,
            &devices,
            &software,
            &out_dir,
            style.into(),
            json_report,
        )
        .map(|paths| {
            for path in paths {
                println!("Report saved to {}", path.display());
            }
        }),
        Commands::Check { cpu, ram, bios } => {
            cmd_check(&policy, cpu.as_deref(), ram.as_deref(), bios.as_deref());
            Ok(())
        }
        Commands::Policy => cmd_policy(&policy),
    }
}

fn load_policy(path: Option<&Path>) -> Result<UpgradePolicy> {
    match path {
        Some(path) => UpgradePolicy::load(path)
            .with_context(|| format!("Failed to load policy from {:?}", path)),
        None => Ok(UpgradePolicy::windows_11()),
    }
}

/// Run the audit and write the reports. Returns the written paths.
///
/// Both tables are loaded before anything is evaluated, so a bad input never
/// leaves a partial report behind.
fn cmd_report(
    policy: &UpgradePolicy,
    devices_path: &Path,
    software_path: &Path,
    out_dir: &Path,
    style: VerdictStyle,
    json_report: bool,
) -> Result<Vec<PathBuf>> {
    let _span = AuditSpan::enter(&policy.target);

    let devices = load_devices(devices_path)
        .with_context(|| format!("Failed to load device inventory {:?}", devices_path))?;
    let installs = load_software(software_path)
        .with_context(|| format!("Failed to load software inventory {:?}", software_path))?;

    let outcome = run_audit(&devices, &installs, policy);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;
    let files = ReportFiles::for_target(&policy.target);
    let mut written = Vec::new();

    let full_path = out_dir.join(&files.full_report);
    write_text_report(
        &full_path,
        &render_full_report(&policy.target, &devices, &outcome, style),
    )?;
    emit_report_written("full", &full_path);
    written.push(full_path);

    let listing_path = out_dir.join(&files.incompatible_listing);
    write_text_report(
        &listing_path,
        &render_incompatible_listing(&outcome.finding_sets, style),
    )?;
    emit_report_written("incompatible", &listing_path);
    written.push(listing_path);

    if json_report {
        let artifact = FindingsArtifact::new(
            input_artifact(devices_path)?,
            input_artifact(software_path)?,
            policy.to_config(),
            &outcome,
        );
        let json_path = out_dir.join(&files.findings_json);
        write_findings_json(&json_path, &artifact)?;
        emit_report_written("findings_json", &json_path);
        written.push(json_path);
    }

    let s = &outcome.summary;
    info!(
        devices = s.devices,
        compatible = s.compatible,
        incompatible = s.incompatible,
        software_findings = s.software_findings,
        "audit complete"
    );
    println!(
        "{} devices evaluated: {} compatible, {} not compatible; {} flagged installs; {} devices to act on",
        s.devices, s.compatible, s.incompatible, s.software_findings, s.devices_with_findings
    );
    METRICS.flush();

    Ok(written)
}

fn input_artifact(path: &Path) -> Result<InputArtifact> {
    Ok(InputArtifact {
        path: path.display().to_string(),
        sha256: digest_file(path).with_context(|| format!("Failed to hash {:?}", path))?,
    })
}

fn cmd_check(policy: &UpgradePolicy, cpu: Option<&str>, ram: Option<&str>, bios: Option<&str>) {
    let verdict = evaluate(policy, cpu, ram, bios);
    println!("{}", verdict.describe(VerdictStyle::Detailed));
    for criterion in verdict.failed_criteria() {
        println!(" - failed: {}", criterion);
    }
}

fn cmd_policy(policy: &UpgradePolicy) -> Result<()> {
    let rendered = policy
        .to_toml_string()
        .context("Failed to render policy")?;
    print!("{}", rendered);
    Ok(())
}
