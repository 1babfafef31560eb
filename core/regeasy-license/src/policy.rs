//! Validation policy: machine binding and expiry.

use crate::error::{FormatError, LicenseError, LicenseResult, RejectionKind};
use crate::record::CredentialRecord;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Outcome of checking a registration code.
#[derive(Debug)]
pub enum Verdict {
    /// The code is valid for this machine; the record is kept for display.
    Accepted(CredentialRecord),
    /// The code was rejected.
    Rejected(Rejection),
}

impl Verdict {
    pub(crate) fn rejected(error: LicenseError) -> Self {
        debug!(kind = ?error.kind(), "registration rejected: {error}");
        Self::Rejected(Rejection { error })
    }

    /// Returns true if the code was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Returns the accepted record.
    #[must_use]
    pub fn record(&self) -> Option<&CredentialRecord> {
        match self {
            Self::Accepted(record) => Some(record),
            Self::Rejected(_) => None,
        }
    }

    /// Returns the rejection class, if rejected.
    #[must_use]
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(rejection) => Some(rejection.kind()),
        }
    }

    /// Returns a human-readable outcome.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Accepted(_) => "registration succeeded".to_string(),
            Self::Rejected(rejection) => rejection.message(),
        }
    }

    /// Converts into a `Result`, handing back the rejection error.
    pub fn into_result(self) -> LicenseResult<CredentialRecord> {
        match self {
            Self::Accepted(record) => Ok(record),
            Self::Rejected(rejection) => Err(rejection.error),
        }
    }
}

/// A rejected registration.
#[derive(Debug)]
pub struct Rejection {
    error: LicenseError,
}

impl Rejection {
    /// Returns the rejection class.
    #[must_use]
    pub fn kind(&self) -> RejectionKind {
        self.error.kind()
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn error(&self) -> &LicenseError {
        &self.error
    }

    /// Returns the bare reason, e.g. `machine mismatch`.
    #[must_use]
    pub fn reason(&self) -> String {
        self.error.to_string()
    }

    /// Returns the reason prefixed with its class, so parse failures and
    /// business rejections read differently.
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind() {
            RejectionKind::Cipher => {
                format!("registration code could not be opened: {}", self.error)
            }
            RejectionKind::Format => format!("registration code is invalid: {}", self.error),
            RejectionKind::Validation => format!("registration rejected: {}", self.error),
        }
    }
}

/// Checks a decoded record against the expected machine and the clock.
///
/// Checks run in order and the first failure wins:
/// 1. expiry strictly after creation,
/// 2. machine id equal to `expected_machine_id` ignoring case,
/// 3. `now` not after the expiry.
#[must_use]
pub fn verify(record: CredentialRecord, expected_machine_id: &str, now: DateTime<Utc>) -> Verdict {
    match check(&record, expected_machine_id, now) {
        Ok(()) => {
            debug!(expires = %record.expired_time(), "registration accepted");
            Verdict::Accepted(record)
        }
        Err(e) => Verdict::rejected(e),
    }
}

/// Same checks as [`verify`], returning the first failure as an error.
pub fn check(
    record: &CredentialRecord,
    expected_machine_id: &str,
    now: DateTime<Utc>,
) -> LicenseResult<()> {
    if !record.has_valid_expiry() {
        return Err(FormatError::InvalidExpiry.into());
    }

    if !machine_ids_match(record.machine_id(), expected_machine_id) {
        return Err(LicenseError::MachineMismatch {
            expected: expected_machine_id.to_string(),
            found: record.machine_id().to_string(),
        });
    }

    if now > record.expired_time() {
        return Err(LicenseError::Expired {
            expired_at: record.expired_time(),
        });
    }

    Ok(())
}

/// Case-insensitive machine id comparison.
pub(crate) fn machine_ids_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_uppercase() == b.to_uppercase()
}
