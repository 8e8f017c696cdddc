//! Utility functions for SQLite storage operations.
//!
//! Timestamps and structured payloads are stored as text. These helpers
//! parse them tolerantly: a malformed column value is logged and replaced
//! with a fallback instead of failing the whole row.

use chrono::{DateTime, Utc};

/// Parses an RFC 3339 timestamp column, falling back to now on failure.
pub(crate) fn parse_datetime_string_tolerant(value_str: &str, field_name: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            log::error!("Failed to parse {} '{}': {}", field_name, value_str, e);
            Utc::now()
        })
}

/// Parses a JSON text column, falling back to the type's default on failure.
pub(crate) fn parse_json_string_tolerant<T>(value_str: &str, field_name: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match serde_json::from_str(value_str) {
        Ok(value) => value,
        Err(e) => {
            log::error!(
                "Failed to parse {} '{}': {}. Falling back to default.",
                field_name,
                value_str,
                e
            );
            T::default()
        }
    }
}

/// Serializes a value into a JSON text column.
pub(crate) fn to_json_string_tolerant<T: serde::Serialize>(value: &T, field_name: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize {}: {}", field_name, e);
        "null".to_string()
    })
}
