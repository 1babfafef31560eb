//! Offline registration codes for RegEasy.
//!
//! This crate handles:
//! - Decoding opened registration payloads (structured JSON and legacy
//!   pipe-delimited) and deriving their expiry
//! - Machine fingerprinting for binding a code to one machine
//! - The validation policy (machine binding, expiry)
//! - Loading the registration configuration
//!
//! # Flow
//!
//! ```text
//! code --open--> plaintext --decode--> CredentialRecord --verify--> Verdict
//! ```
//!
//! Opening uses [`regeasy_crypto`]. No step contacts a server.
//!
//! # Limitations
//!
//! The sealing password ships with the verifying application and the key is
//! derived from it alone. This deters casual copying; it does not stop an
//! attacker who controls the verifying machine.

mod config;
mod device;
mod error;
mod payload;
mod policy;
mod probe;
mod record;
mod registration;
mod time;

pub use config::{RegistrationConfig, CONFIG_FILE, CONFIG_SUBDIR, USER_CONFIG_DIR};
pub use device::{
    current_fingerprint, format_machine_id, reduce_identity, Fingerprint, InstallationIdProvider,
    MachineIdGenerator, RawIdentitySource, FINGERPRINT_LEN, INSTALLATION_ERROR,
    INSTALLATION_UNKNOWN, PROBE_TIMEOUT,
};
pub use error::{FormatError, LicenseError, LicenseResult, RejectionKind};
pub use payload::{decode, encode, PayloadFormat, DELIMITED_FIELD_COUNT, DELIMITER};
pub use policy::{check, verify, Rejection, Verdict};
pub use record::{derive_expiry, CredentialRecord, UNLIMITED_TERM_MONTHS};
pub use registration::{
    check_local, check_registration, check_registration_with, decode_registration, issue,
    issue_with,
};
pub use time::{parse_structured, DELIMITED_TS_FORMAT, STRUCTURED_TS_FORMAT};

pub use regeasy_crypto::{CipherError, PassthroughCipher, PasswordCipher, TextCipher};
