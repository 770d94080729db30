//! Date formats used in the database document.
//!
//! Calendar dates are stored as `MM-DD-YYYY`; download timestamps as
//! `MM-DD-YYYY HH:MM:SS` in local time.

use chrono::{NaiveDate, NaiveDateTime};

/// Storage format for calendar dates.
pub const DATE_FORMAT: &str = "%m-%d-%Y";

/// Storage format for download timestamps.
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

/// Parses a `MM-DD-YYYY` date.
///
/// # Errors
///
/// Returns the chrono parse error for any other shape.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

/// Renders a date as `MM-DD-YYYY`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Renders a timestamp as `MM-DD-YYYY HH:MM:SS`.
#[must_use]
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).or_else(|error| {
        // Bare dates are accepted for hand-edited documents.
        parse_date(value)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or(error)
    })
}

pub(crate) mod date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw)
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{raw}': {e}")))
    }
}

pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&super::format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_date(&raw)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid date '{raw}': {e}"))),
            _ => Ok(None),
        }
    }
}

pub(crate) mod optional_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(timestamp) => serializer.serialize_str(&super::format_timestamp(*timestamp)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_timestamp(&raw)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}"))),
            _ => Ok(None),
        }
    }
}
