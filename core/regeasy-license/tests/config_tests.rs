use regeasy_license::{LicenseError, RegistrationConfig, CONFIG_FILE, CONFIG_SUBDIR};
use std::fs;
use tempfile::TempDir;

#[test]
fn parses_password_and_uri() {
    let config =
        RegistrationConfig::from_json(r#"{"password":"secret","uri":"https://example.com/buy"}"#)
            .unwrap();
    assert_eq!(config.password, "secret");
    assert_eq!(config.purchase_uri(), Some("https://example.com/buy"));
}

#[test]
fn keys_are_case_insensitive() {
    let config = RegistrationConfig::from_json(r#"{"Password":"p","URI":"u"}"#).unwrap();
    assert_eq!(config.password, "p");
    assert_eq!(config.uri, "u");
}

#[test]
fn missing_keys_default_to_empty() {
    let config = RegistrationConfig::from_json("{}").unwrap();
    assert_eq!(config, RegistrationConfig::default());
    assert_eq!(config.purchase_uri(), None);
}

#[test]
fn non_string_value_is_error() {
    let err = RegistrationConfig::from_json(r#"{"password":42}"#).unwrap_err();
    assert!(matches!(err, LicenseError::Config(_)));
}

#[test]
fn malformed_json_is_error() {
    assert!(RegistrationConfig::from_json("{password:").is_err());
    assert!(RegistrationConfig::from_json("[]").is_err());
}

#[test]
fn load_from_base_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), r#"{"password":"base"}"#).unwrap();
    assert_eq!(RegistrationConfig::load_from(dir.path()).unwrap().password, "base");
}

#[test]
fn load_from_subdir() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join(CONFIG_SUBDIR);
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join(CONFIG_FILE), r#"{"password":"nested"}"#).unwrap();
    assert_eq!(RegistrationConfig::load_from(dir.path()).unwrap().password, "nested");
}

#[test]
fn base_dir_wins_over_subdir() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join(CONFIG_SUBDIR);
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join(CONFIG_FILE), r#"{"password":"base"}"#).unwrap();
    fs::write(sub.join(CONFIG_FILE), r#"{"password":"nested"}"#).unwrap();
    assert_eq!(RegistrationConfig::load_from(dir.path()).unwrap().password, "base");
}

#[test]
fn missing_file_gives_default() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        RegistrationConfig::load_from(dir.path()).unwrap(),
        RegistrationConfig::default()
    );
}

#[test]
fn byte_order_mark_is_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "\u{feff}{\"password\":\"bom\"}").unwrap();
    assert_eq!(RegistrationConfig::load_from(dir.path()).unwrap().password, "bom");
}

#[test]
fn debug_redacts_password() {
    let config = RegistrationConfig {
        password: "hunter2".to_string(),
        uri: "https://example.com".to_string(),
    };
    let debug = format!("{config:?}");
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("[REDACTED]"));
}
