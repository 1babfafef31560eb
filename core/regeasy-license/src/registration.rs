//! Opening, decoding and verifying registration codes.
//!
//! Every failure on the way (cipher, payload, policy) ends up as a
//! [`Verdict::Rejected`]; nothing here panics or propagates a fault for a bad
//! code.

use crate::device::current_fingerprint;
use crate::error::{FormatError, LicenseResult};
use crate::payload::{self, PayloadFormat};
use crate::policy::{self, Verdict};
use crate::record::CredentialRecord;
use chrono::{DateTime, Utc};
use regeasy_crypto::{PasswordCipher, TextCipher};

/// Opens and decodes a registration code without applying the policy.
///
/// # Errors
///
/// Returns `LicenseError::Cipher` if the code cannot be opened and
/// `LicenseError::Format` if the payload does not parse.
pub fn decode_registration(cipher: &dyn TextCipher, code: &str) -> LicenseResult<CredentialRecord> {
    let code = code.trim();
    if code.is_empty() {
        return Err(FormatError::Empty.into());
    }
    let plaintext = cipher.open(code)?;
    payload::decode(&plaintext)
}

/// Checks a registration code sealed under `password`.
#[must_use]
pub fn check_registration(
    code: &str,
    password: &str,
    expected_machine_id: &str,
    now: DateTime<Utc>,
) -> Verdict {
    check_registration_with(&PasswordCipher::new(password), code, expected_machine_id, now)
}

/// Checks a registration code with an explicit cipher.
#[must_use]
pub fn check_registration_with(
    cipher: &dyn TextCipher,
    code: &str,
    expected_machine_id: &str,
    now: DateTime<Utc>,
) -> Verdict {
    match decode_registration(cipher, code) {
        Ok(record) => policy::verify(record, expected_machine_id, now),
        Err(e) => Verdict::rejected(e),
    }
}

/// Checks a registration code against this machine's fingerprint.
#[must_use]
pub fn check_local(code: &str, password: &str, now: DateTime<Utc>) -> Verdict {
    let fingerprint = current_fingerprint();
    check_registration(code, password, fingerprint.as_str(), now)
}

/// Encodes `record` in `format` and seals it under `password`.
///
/// # Errors
///
/// Returns `LicenseError::Format` if the record cannot be encoded in the
/// chosen format.
pub fn issue(
    record: &CredentialRecord,
    format: PayloadFormat,
    password: &str,
) -> LicenseResult<String> {
    issue_with(&PasswordCipher::new(password), record, format)
}

/// Encodes and seals `record` with an explicit cipher.
pub fn issue_with(
    cipher: &dyn TextCipher,
    record: &CredentialRecord,
    format: PayloadFormat,
) -> LicenseResult<String> {
    let plaintext = payload::encode(record, format)?;
    Ok(cipher.seal(&plaintext))
}
