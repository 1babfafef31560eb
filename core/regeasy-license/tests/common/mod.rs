//! Shared test helpers for registration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

pub const PASSWORD: &str = "secret";
pub const MACHINE: &str = "AAAA-BBBB-CCCC-DDDD";

pub const STRUCTURED: &str =
    r#"{"machineId":"AAAA-BBBB-CCCC-DDDD","period":12,"ts":"2024-01-01 00:00:00"}"#;
pub const DELIMITED: &str = "2024-01-01T00:00:00|12|AAAA-BBBB-CCCC-DDDD|PRO|2025-06-01T00:00:00";

/// `STRUCTURED` sealed under `PASSWORD` by an earlier release.
pub const STRUCTURED_CODE: &str = "zkrAx/1YrQC862DAFYy72cT2QVB5vq7sXC1JUi/gh4hL51yM4oUskCRkn19NsyAeSkZsFpNC6TdZU9xoVy8KyjSEHIRynDF9MsZjD4ccvp8=";

/// `DELIMITED` sealed under `PASSWORD` by an earlier release.
pub const DELIMITED_CODE: &str = "qXO3BbMDEh4rTlP+T701figIFBDoE83c1anKtKRk1d1uHXnFq4O3bZ9bmW9riHDZVSmNzgsoDkuTs6+EB56qQON62Ge7h3Y5lJKijiIe7f4=";

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub fn day(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
    utc(y, mo, d, 0, 0, 0)
}

/// Builds a structured payload with the given fields.
pub fn structured(machine_id: &str, period: i32, ts: &str) -> String {
    format!(r#"{{"machineId":"{machine_id}","period":{period},"ts":"{ts}"}}"#)
}
