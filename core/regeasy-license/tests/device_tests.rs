use proptest::prelude::*;
use regeasy_license::{
    format_machine_id, reduce_identity, Fingerprint, MachineIdGenerator, RawIdentitySource,
    FINGERPRINT_LEN, INSTALLATION_ERROR, INSTALLATION_UNKNOWN,
};
use std::fs;
use tempfile::TempDir;

// ── format_machine_id ────────────────────────────────────────────

#[test]
fn groups_sixteen_hex_chars() {
    assert_eq!(format_machine_id("1A2B3C4D5E6F7081"), "1A2B-3C4D-5E6F-7081");
}

#[test]
fn pads_short_input_with_zeros() {
    assert_eq!(format_machine_id("abc"), "ABC0-0000-0000-0000");
    assert_eq!(format_machine_id(""), "0000-0000-0000-0000");
}

#[test]
fn truncates_long_input() {
    assert_eq!(
        format_machine_id("0123456789abcdef0123456789"),
        "0123-4567-89AB-CDEF"
    );
}

#[test]
fn drops_separators_before_grouping() {
    assert_eq!(format_machine_id("1a2b-3c4d-5e6f-7081"), "1A2B-3C4D-5E6F-7081");
    assert_eq!(format_machine_id("  1a:2b 3c"), "1A2B-3C00-0000-0000");
}

#[test]
fn uppercasing_keeps_one_char_per_char() {
    assert_eq!(format_machine_id("straße"), "STRA-ßE00-0000-0000");
    assert_eq!(format_machine_id("éa"), "ÉA00-0000-0000-0000");
}

#[test]
fn formatting_is_idempotent() {
    let once = format_machine_id("deadbeef");
    assert_eq!(format_machine_id(&once), once);
}

// ── reduce_identity ──────────────────────────────────────────────

#[test]
fn reduce_known_answer() {
    assert_eq!(reduce_identity("test-host-identity"), "8E244C4A824CD747");
}

#[test]
fn reduce_is_sixteen_uppercase_hex() {
    let reduced = reduce_identity("CPU|BOARD|DISK");
    assert_eq!(reduced.len(), FINGERPRINT_LEN);
    assert!(reduced.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
}

// ── MachineIdGenerator ───────────────────────────────────────────

#[test]
fn machine_id_file_source() {
    let dir = TempDir::new().unwrap();
    let primary = dir.path().join("machine-id");
    fs::write(&primary, "test-host-identity\n").unwrap();

    let generator = MachineIdGenerator::with_source(RawIdentitySource::MachineIdFile {
        primary,
        secondary: dir.path().join("missing"),
    });
    assert_eq!(
        generator.fingerprint(),
        Fingerprint::Grouped("8E24-4C4A-824C-D747".to_string())
    );
}

#[test]
fn machine_id_file_falls_back_to_secondary() {
    let dir = TempDir::new().unwrap();
    let secondary = dir.path().join("dbus-machine-id");
    fs::write(&secondary, "test-host-identity").unwrap();

    let generator = MachineIdGenerator::with_source(RawIdentitySource::MachineIdFile {
        primary: dir.path().join("missing"),
        secondary,
    });
    assert_eq!(generator.fingerprint().as_str(), "8E24-4C4A-824C-D747");
}

#[test]
fn unreadable_sources_fall_back_to_host_name() {
    let dir = TempDir::new().unwrap();
    let from_files = MachineIdGenerator::with_source(RawIdentitySource::MachineIdFile {
        primary: dir.path().join("a"),
        secondary: dir.path().join("b"),
    });
    let from_host = MachineIdGenerator::with_source(RawIdentitySource::HostName);
    assert_eq!(from_files.fingerprint(), from_host.fingerprint());
}

#[test]
fn host_name_fingerprint_is_grouped_and_stable() {
    let generator = MachineIdGenerator::with_source(RawIdentitySource::HostName);
    let first = generator.fingerprint();
    assert_eq!(first, generator.fingerprint());

    let text = first.as_str();
    assert_eq!(text.len(), 19);
    assert_eq!(text.matches('-').count(), 3);
}

#[test]
fn installation_id_is_used_verbatim() {
    let generator = MachineIdGenerator::with_source(RawIdentitySource::installation(|| {
        Ok(Some("9774d56d682e549c".to_string()))
    }));
    assert_eq!(
        generator.fingerprint(),
        Fingerprint::Installation("9774d56d682e549c".to_string())
    );
}

#[test]
fn installation_sentinels() {
    let unknown = MachineIdGenerator::with_source(RawIdentitySource::installation(|| Ok(None)));
    assert_eq!(unknown.fingerprint().as_str(), INSTALLATION_UNKNOWN);

    let failing = MachineIdGenerator::with_source(RawIdentitySource::installation(|| {
        Err("resolver unavailable".into())
    }));
    assert_eq!(failing.fingerprint().as_str(), INSTALLATION_ERROR);
}

#[test]
fn fingerprint_matches_ignoring_case() {
    let fp = Fingerprint::Grouped("1A2B-3C4D-5E6F-7081".to_string());
    assert!(fp.matches("1a2b-3c4d-5e6f-7081"));
    assert!(!fp.matches("1A2B-3C4D-5E6F-7082"));
    assert_eq!(fp.to_string(), "1A2B-3C4D-5E6F-7081");
}

#[cfg(unix)]
#[test]
fn platform_utility_output_is_reduced() {
    let generator = MachineIdGenerator::with_source(RawIdentitySource::PlatformUtility {
        program: "echo".to_string(),
        args: vec!["test-host-identity".to_string()],
        timeout: std::time::Duration::from_secs(5),
    });
    assert_eq!(generator.fingerprint().as_str(), "8E24-4C4A-824C-D747");
}

#[test]
fn source_debug_hides_provider() {
    let source = RawIdentitySource::installation(|| Ok(None));
    assert_eq!(format!("{source:?}"), "Installation(..)");
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn formatted_shape_holds(input in ".{0,64}") {
        let id = format_machine_id(&input);
        let groups: Vec<&str> = id.split('-').collect();
        prop_assert_eq!(groups.len(), 4);
        for group in groups {
            prop_assert_eq!(group.chars().count(), 4);
        }
    }

    #[test]
    fn reduced_then_formatted_is_canonical(raw in ".{0,128}") {
        let id = format_machine_id(&reduce_identity(&raw));
        prop_assert_eq!(id.len(), 19);
        prop_assert_eq!(format_machine_id(&id), id.clone());
    }
}
