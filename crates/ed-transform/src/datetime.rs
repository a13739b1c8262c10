//! `intime` parsing.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ed_model::columns::{INTIME, STAY_ID};
use polars::prelude::DataFrame;

use crate::error::{Result, TransformError};
use crate::frame::{required_keys, string_values};

/// Parse a naive timestamp or a bare date (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    let formats = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Parsed `intime` per row. Null or blank values are `None`.
pub fn intime_values(df: &DataFrame) -> Result<Vec<Option<NaiveDateTime>>> {
    let stays = required_keys(df, STAY_ID)?;
    let raw = string_values(df, INTIME)?;
    raw.into_iter()
        .zip(stays)
        .map(|(value, stay_id)| match value {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => match parse_timestamp(&text) {
                Some(dt) => Ok(Some(dt)),
                None => Err(TransformError::InvalidTimestamp {
                    stay_id,
                    value: text,
                }),
            },
        })
        .collect()
}

/// Ascending order with missing values last.
pub fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_space_and_t_separated_timestamps() {
        let dt = parse_timestamp("2180-07-23 05:54:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2180, 7, 23, 5));
        assert_eq!(parse_timestamp("2180-07-23T05:54:00"), Some(dt));
        assert!(parse_timestamp("2180-07-23 05:54:00.250").is_some());
        assert!(parse_timestamp("2180-07-23 05:54").is_some());
    }

    #[test]
    fn date_only_is_midnight() {
        let dt = parse_timestamp("2181-02-01").unwrap();
        assert_eq!(dt.time(), NaiveTime::MIN);
        assert_eq!(dt.year(), 2181);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2180-13-01").is_none());
    }

    #[test]
    fn missing_sorts_last() {
        assert_eq!(nulls_last(Some(1), None), Ordering::Less);
        assert_eq!(nulls_last(None, Some(1)), Ordering::Greater);
        assert_eq!(nulls_last::<i32>(None, None), Ordering::Equal);
        assert_eq!(nulls_last(Some(2), Some(1)), Ordering::Greater);
    }
}
