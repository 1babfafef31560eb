//! Credential payload codec.
//!
//! Two payload shapes are in circulation and both stay decodable:
//!
//! - **Structured**: a JSON object with `machineId`, `period` and `ts`
//!   (`yyyy-MM-dd HH:mm:ss`), plus optional `quota`. Keys match
//!   case-insensitively. Expiry is always derived from `ts` and `period`;
//!   any serialized expiry is ignored.
//! - **Delimited**: `create|period|machine|quota|expired`, exactly five
//!   fields. Expiry is taken literally from the last field.
//!
//! The format is sniffed from the first non-whitespace character.

use crate::error::{FormatError, LicenseResult};
use crate::record::{derive_expiry, CredentialRecord};
use crate::time;
use serde::Serialize;
use serde_json::{Map, Value};

/// Number of fields in a delimited payload.
pub const DELIMITED_FIELD_COUNT: usize = 5;

/// Field separator of the delimited payload.
pub const DELIMITER: char = '|';

/// The payload encodings the codec recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadFormat {
    /// JSON object with derived expiry.
    Structured,
    /// Legacy pipe-separated fields with literal expiry.
    Delimited,
}

impl PayloadFormat {
    /// Detects the format of an opened payload.
    #[must_use]
    pub fn detect(plaintext: &str) -> Self {
        if plaintext.trim().starts_with('{') {
            Self::Structured
        } else {
            Self::Delimited
        }
    }
}

/// Decodes an opened payload into a record.
///
/// # Errors
///
/// Returns [`FormatError`] (wrapped in `LicenseError::Format`) when the
/// payload does not parse or its expiry is not after its creation time.
pub fn decode(plaintext: &str) -> LicenseResult<CredentialRecord> {
    let text = plaintext.trim();
    let record = match PayloadFormat::detect(text) {
        PayloadFormat::Structured => decode_structured(text)?,
        PayloadFormat::Delimited => decode_delimited(text)?,
    };

    if !record.has_valid_expiry() {
        return Err(FormatError::InvalidExpiry.into());
    }
    Ok(record)
}

/// Encodes a record in the given format.
///
/// # Errors
///
/// Delimited encoding fails if the machine id or quota contains `|`.
pub fn encode(record: &CredentialRecord, format: PayloadFormat) -> LicenseResult<String> {
    match format {
        PayloadFormat::Structured => encode_structured(record),
        PayloadFormat::Delimited => encode_delimited(record),
    }
}

fn decode_structured(text: &str) -> LicenseResult<CredentialRecord> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| FormatError::InvalidJson(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(FormatError::InvalidJson("payload is not an object".to_string()).into());
    };

    let machine_id = match field_ci(&map, "machineId") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => return Err(FormatError::MissingField("machineId").into()),
        Some(_) => {
            return Err(FormatError::FieldType {
                field: "machineId",
                expected: "a string",
            }
            .into());
        }
    };

    let period_type = match field_ci(&map, "period") {
        Some(Value::Null) | None => 0,
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|p| i32::try_from(p).ok())
            .ok_or_else(|| FormatError::InvalidPeriod(n.to_string()))?,
        Some(other) => return Err(FormatError::InvalidPeriod(other.to_string()).into()),
    };

    let ts = match field_ci(&map, "ts") {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => return Err(FormatError::MissingField("ts").into()),
        Some(other) => {
            return Err(FormatError::InvalidTimestamp {
                field: "ts",
                value: other.to_string(),
            }
            .into());
        }
    };
    let create_time = time::parse_structured(ts).ok_or_else(|| FormatError::InvalidTimestamp {
        field: "ts",
        value: ts.clone(),
    })?;

    let quota = match field_ci(&map, "quota") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let expired_time = derive_expiry(create_time, period_type)?;
    Ok(CredentialRecord::new(machine_id, period_type, create_time, expired_time)
        .with_quota(quota)
        .with_format(PayloadFormat::Structured))
}

fn decode_delimited(text: &str) -> LicenseResult<CredentialRecord> {
    let parts: Vec<&str> = text.split(DELIMITER).collect();
    let [create, period, machine_id, quota, expired] = parts[..] else {
        return Err(FormatError::FieldCount {
            expected: DELIMITED_FIELD_COUNT,
            found: parts.len(),
        }
        .into());
    };

    let create_time = time::parse_invariant(create).ok_or_else(|| FormatError::InvalidTimestamp {
        field: "create time",
        value: create.to_string(),
    })?;

    let period_type = if period.trim().is_empty() {
        0
    } else {
        period
            .trim()
            .parse::<i32>()
            .map_err(|_| FormatError::InvalidPeriod(period.to_string()))?
    };

    let expired_time =
        time::parse_invariant(expired).ok_or_else(|| FormatError::InvalidTimestamp {
            field: "expire time",
            value: expired.to_string(),
        })?;

    Ok(CredentialRecord::new(machine_id, period_type, create_time, expired_time)
        .with_quota(quota)
        .with_format(PayloadFormat::Delimited))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredPayload<'a> {
    machine_id: &'a str,
    period: i32,
    ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    quota: Option<&'a str>,
}

fn encode_structured(record: &CredentialRecord) -> LicenseResult<String> {
    let payload = StructuredPayload {
        machine_id: record.machine_id(),
        period: record.period_type(),
        ts: time::format_structured(&record.create_time()),
        quota: record.quota(),
    };
    serde_json::to_string(&payload).map_err(|e| FormatError::InvalidJson(e.to_string()).into())
}

fn encode_delimited(record: &CredentialRecord) -> LicenseResult<String> {
    if record.machine_id().contains(DELIMITER) {
        return Err(FormatError::ReservedDelimiter { field: "machine id" }.into());
    }
    let quota = record.quota().unwrap_or_default();
    if quota.contains(DELIMITER) {
        return Err(FormatError::ReservedDelimiter { field: "quota" }.into());
    }

    Ok([
        time::format_delimited(&record.create_time()),
        record.period_type().to_string(),
        record.machine_id().to_string(),
        quota.to_string(),
        time::format_delimited(&record.expired_time()),
    ]
    .join("|"))
}

/// Looks up `name` in a JSON object ignoring ASCII case.
///
/// An exact match wins over a case-folded one.
pub(crate) fn field_ci<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}
