//! Error types for registration decoding and validation.

use chrono::{DateTime, Utc};
use regeasy_crypto::CipherError;
use thiserror::Error;

/// Payload parse failures. Each variant carries the offending fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The registration code was empty after trimming.
    #[error("registration code is empty")]
    Empty,

    /// Delimited payload with the wrong number of fields.
    #[error("invalid format, expected {expected} fields but got {found}")]
    FieldCount { expected: usize, found: usize },

    /// A timestamp field did not parse.
    #[error("invalid {field}: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// The period field is not an integer.
    #[error("invalid period type: {0}")]
    InvalidPeriod(String),

    /// A required structured field is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A structured field has the wrong JSON type.
    #[error("field {field} must be {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },

    /// The structured payload is not a JSON object.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),

    /// A value cannot be written into a delimited payload.
    #[error("{field} must not contain '|'")]
    ReservedDelimiter { field: &'static str },

    /// Expiry is not strictly after creation, or could not be computed.
    #[error("expired time is invalid")]
    InvalidExpiry,
}

/// Errors produced while opening, decoding or validating a registration code.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The code could not be opened (bad base64, wrong password, truncated).
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The opened payload could not be parsed.
    #[error("parsing failed: {0}")]
    Format(#[from] FormatError),

    /// The code is bound to a different machine.
    #[error("machine mismatch")]
    MachineMismatch { expected: String, found: String },

    /// The code has expired.
    #[error("expired on {}", expired_at.format("%Y-%m-%d %H:%M:%S"))]
    Expired { expired_at: DateTime<Utc> },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl LicenseError {
    /// Classifies the error for user-facing reporting.
    ///
    /// Configuration problems are reported with the cipher class: both mean
    /// the code could not be opened with the material at hand.
    #[must_use]
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::Cipher(_) | Self::Config(_) => RejectionKind::Cipher,
            Self::Format(_) => RejectionKind::Format,
            Self::MachineMismatch { .. } | Self::Expired { .. } => RejectionKind::Validation,
        }
    }
}

/// Why a registration code was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// The code could not be opened.
    Cipher,
    /// The payload was malformed.
    Format,
    /// The payload was valid but failed machine binding or expiry.
    Validation,
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
