//! The decoded credential record.

use crate::error::{FormatError, LicenseResult};
use crate::payload::PayloadFormat;
use chrono::{DateTime, Months, Utc};

/// Term used for unlimited registrations (50 years).
pub const UNLIMITED_TERM_MONTHS: u32 = 50 * 12;

/// A decoded registration.
///
/// Created fresh by every decode and discarded after the accept/reject
/// decision. `expired_time > create_time` is checked by the decoder and again
/// by the validation policy, not by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    machine_id: String,
    period_type: i32,
    create_time: DateTime<Utc>,
    expired_time: DateTime<Utc>,
    quota: Option<String>,
    format: PayloadFormat,
}

impl CredentialRecord {
    /// Creates a record with an explicit expiry.
    #[must_use]
    pub fn new(
        machine_id: impl Into<String>,
        period_type: i32,
        create_time: DateTime<Utc>,
        expired_time: DateTime<Utc>,
    ) -> Self {
        Self {
            machine_id: machine_id.into(),
            period_type,
            create_time,
            expired_time,
            quota: None,
            format: PayloadFormat::Delimited,
        }
    }

    /// Creates a record whose expiry is derived from the period.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidExpiry`] if the expiry overflows the
    /// supported date range.
    pub fn with_period(
        machine_id: impl Into<String>,
        period_type: i32,
        create_time: DateTime<Utc>,
    ) -> LicenseResult<Self> {
        let expired_time = derive_expiry(create_time, period_type)?;
        Ok(Self {
            machine_id: machine_id.into(),
            period_type,
            create_time,
            expired_time,
            quota: None,
            format: PayloadFormat::Structured,
        })
    }

    /// Attaches opaque quota metadata.
    #[must_use]
    pub fn with_quota(mut self, quota: impl Into<String>) -> Self {
        let quota = quota.into();
        self.quota = (!quota.is_empty()).then_some(quota);
        self
    }

    pub(crate) fn with_format(mut self, format: PayloadFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the machine id the code is bound to.
    #[must_use]
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    /// Returns the period in months; non-positive means unlimited.
    #[must_use]
    pub fn period_type(&self) -> i32 {
        self.period_type
    }

    /// Returns true if the period means unlimited.
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.period_type <= 0
    }

    /// Returns the creation instant.
    #[must_use]
    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    /// Returns the expiry instant.
    #[must_use]
    pub fn expired_time(&self) -> DateTime<Utc> {
        self.expired_time
    }

    /// Returns the quota metadata, if any.
    #[must_use]
    pub fn quota(&self) -> Option<&str> {
        self.quota.as_deref()
    }

    /// Returns the payload format the record was decoded from.
    #[must_use]
    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    /// Returns true if expiry is strictly after creation.
    #[must_use]
    pub fn has_valid_expiry(&self) -> bool {
        self.expired_time > self.create_time
    }
}

/// Expiry rule of the structured format: `period` months after creation, or
/// [`UNLIMITED_TERM_MONTHS`] when the period is not positive.
///
/// Month arithmetic clamps to the last day of the target month.
pub fn derive_expiry(create_time: DateTime<Utc>, period_type: i32) -> LicenseResult<DateTime<Utc>> {
    let months = u32::try_from(period_type)
        .ok()
        .filter(|m| *m > 0)
        .unwrap_or(UNLIMITED_TERM_MONTHS);
    create_time
        .checked_add_months(Months::new(months))
        .ok_or_else(|| FormatError::InvalidExpiry.into())
}
