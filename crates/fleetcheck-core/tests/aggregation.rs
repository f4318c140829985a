//! End-to-end aggregation over in-memory tables.

use std::collections::HashSet;

use fleetcheck_core::{
    aggregate, render_full_report, render_incompatible_listing, run_audit, scan,
    CompatibilityVerdict, DeviceRecord, DeviceVerdict, SoftwareInstallRecord, UpgradePolicy,
    VerdictStyle,
};

fn fleet() -> (Vec<DeviceRecord>, Vec<SoftwareInstallRecord>) {
    let devices = vec![
        DeviceRecord::new("CLEAN")
            .with_cpu("Intel(R) Core(TM) i5-10310U")
            .with_ram("16 GB")
            .with_bios_released("2021-04-12"),
        DeviceRecord::new("OLD-HW")
            .with_cpu("Intel(R) Core(TM) i5-4590")
            .with_ram("8 GB")
            .with_bios_released("2014-09-01"),
        DeviceRecord::new("SW-ONLY")
            .with_cpu("AMD Ryzen 5 3500U")
            .with_ram("8 GB")
            .with_bios_released("2019-10-10"),
        DeviceRecord::new("NO-CPU").with_cpu("NaN").with_ram("8 GB"),
    ];
    let installs = vec![
        SoftwareInstallRecord::new("CLEAN", "Microsoft Edge", "120.0"),
        SoftwareInstallRecord::new("SW-ONLY", "Symantec Endpoint Protection", "14.2"),
        SoftwareInstallRecord::new("ORPHAN", "Adobe Flash Player 32 ActiveX", "32.0"),
        SoftwareInstallRecord::new("OLD-HW", "AutoCAD 2016", "20.1"),
        SoftwareInstallRecord::new("SW-ONLY", "Google Chrome", "121.0"),
    ];
    (devices, installs)
}

#[test]
fn clean_devices_are_excluded() {
    let (devices, installs) = fleet();
    let outcome = run_audit(&devices, &installs, &UpgradePolicy::windows_11());
    assert!(outcome.finding_sets.iter().all(|s| s.hostname != "CLEAN"));
}

#[test]
fn every_problem_device_appears_exactly_once() {
    let (devices, installs) = fleet();
    let outcome = run_audit(&devices, &installs, &UpgradePolicy::windows_11());

    let hosts: Vec<&str> = outcome
        .finding_sets
        .iter()
        .map(|s| s.hostname.as_str())
        .collect();
    assert_eq!(hosts, vec!["OLD-HW", "NO-CPU", "SW-ONLY", "ORPHAN"]);

    let unique: HashSet<&str> = hosts.iter().copied().collect();
    assert_eq!(unique.len(), hosts.len());
}

#[test]
fn hardware_set_carries_software_findings_too() {
    let (devices, installs) = fleet();
    let outcome = run_audit(&devices, &installs, &UpgradePolicy::windows_11());

    let old = &outcome.finding_sets[0];
    assert_eq!(old.hostname, "OLD-HW");
    assert!(old.has_hardware_issue());
    assert_eq!(old.software.len(), 1);
    assert_eq!(old.software[0].software, "AutoCAD 2016");

    let sw_only = &outcome.finding_sets[2];
    assert!(sw_only.hardware.is_none());
    assert_eq!(sw_only.software.len(), 1);
}

#[test]
fn aggregate_with_no_problems_is_empty() {
    let verdicts = vec![DeviceVerdict {
        hostname: "A".to_string(),
        verdict: CompatibilityVerdict::Compatible,
    }];
    let software = scan(
        &[SoftwareInstallRecord::new("A", "7-Zip", "23.01")],
        &UpgradePolicy::windows_11().denylist,
    );
    assert!(aggregate(&verdicts, &software).is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let (devices, installs) = fleet();
    let policy = UpgradePolicy::windows_11();

    let first = run_audit(&devices, &installs, &policy);
    let second = run_audit(&devices, &installs, &policy);
    assert_eq!(first, second);

    assert_eq!(
        serde_json::to_string(&first.finding_sets).expect("serialize"),
        serde_json::to_string(&second.finding_sets).expect("serialize")
    );
    assert_eq!(
        render_full_report("Windows 11", &devices, &first, VerdictStyle::Detailed),
        render_full_report("Windows 11", &devices, &second, VerdictStyle::Detailed)
    );
    assert_eq!(
        render_incompatible_listing(&first.finding_sets, VerdictStyle::Terse),
        render_incompatible_listing(&second.finding_sets, VerdictStyle::Terse)
    );
}

#[test]
fn terse_listing_is_subset_of_detailed() {
    let (devices, installs) = fleet();
    let outcome = run_audit(&devices, &installs, &UpgradePolicy::windows_11());

    let detailed = render_incompatible_listing(&outcome.finding_sets, VerdictStyle::Detailed);
    let terse = render_incompatible_listing(&outcome.finding_sets, VerdictStyle::Terse);

    assert!(detailed.contains(
        " - Hardware Requirements - Not Compatible (CPU_OK: false, RAM_OK: true, BIOS_OK: false)"
    ));
    assert!(terse.contains(" - Hardware Requirements - Not Compatible\n"));
    for line in terse.lines() {
        let prefix = line.trim_end();
        assert!(
            detailed.lines().any(|d| d.starts_with(prefix)),
            "terse line {prefix:?} missing from detailed listing"
        );
    }
}
