//! Date schema
//!
//! Accepts RFC 3339 / ISO 8601 strings and integer unix timestamps, so a
//! source schema using either date encoding validates against the same
//! compiled form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::{constraint, type_mismatch, Common};
use crate::error::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct DateSchema {
    pub(crate) common: Common,
    min: Option<DateTime<Utc>>,
    max: Option<DateTime<Utc>>,
}

/// Interpret a JSON value as an instant: RFC 3339 / ISO 8601 strings
/// (with or without a time component) or unix seconds.
pub fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|dt| dt.and_utc())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            }),
        Value::Number(_) => value
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

impl DateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest accepted instant
    pub fn min(mut self, limit: DateTime<Utc>) -> Self {
        self.min = Some(limit);
        self
    }

    /// Latest accepted instant
    pub fn max(mut self, limit: DateTime<Utc>) -> Self {
        self.max = Some(limit);
        self
    }

    pub(crate) fn check(&self, value: &Value, label: &str) -> Result<Value, ValidationError> {
        let instant = parse_date_value(value).ok_or_else(|| type_mismatch(label, "a date"))?;

        if let Some(limit) = self.min {
            if instant < limit {
                return Err(constraint(label, format!("must not be before {}", limit)));
            }
        }
        if let Some(limit) = self.max {
            if instant > limit {
                return Err(constraint(label, format!("must not be after {}", limit)));
            }
        }

        Ok(value.clone())
    }
}
