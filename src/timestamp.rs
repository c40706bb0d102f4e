use crate::error::ScanError;
use chrono::NaiveDateTime;

/// The only timestamp shape packs and cutoffs are written in.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ScanError> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|source| ScanError::Timestamp {
        value: value.to_string(),
        format: DATE_FORMAT,
        source,
    })
}
