//! Order-book depth rows: ten percentage buckets bundled in one record.
//!
//! Each bucket is a [`Unit`] encoded with `|` between its fields; buckets
//! are joined with `@` in [`BOOK_DEPTH_PERCENTS`] order.

use crate::domain::data::{Data, FIELD_DELIMITER, Unit};
use crate::domain::error::ArchivistError;
use crate::domain::time_unit::TimeUnit;
use chrono::TimeDelta;

/// Bucket order of a row, in percent distance from the mid price.
pub const BOOK_DEPTH_PERCENTS: [i8; 10] = [-5, -4, -3, -2, -1, 1, 2, 3, 4, 5];

/// Delimiter between the fields of one bucket.
pub const BUCKET_DELIMITER: char = '|';

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BookDepthRow {
    pub buckets: [Unit; 10],
    pub time: TimeUnit,
}

impl BookDepthRow {
    /// Row with one observation per bucket, in [`BOOK_DEPTH_PERCENTS`] order.
    pub fn from_values(values: [f64; 10], time: TimeUnit) -> Self {
        BookDepthRow {
            buckets: values.map(|v| Unit::new(v).with_time(time)),
            time,
        }
    }

    pub fn bucket(&self, percent: i8) -> Option<&Unit> {
        BOOK_DEPTH_PERCENTS
            .iter()
            .position(|p| *p == percent)
            .map(|i| &self.buckets[i])
    }

    pub fn serialize(&self, precision: i8) -> String {
        self.buckets
            .iter()
            .map(|u| {
                if u.is_empty() {
                    String::new()
                } else {
                    u.serialize_with(precision, BUCKET_DELIMITER)
                }
            })
            .collect::<Vec<_>>()
            .join(&FIELD_DELIMITER.to_string())
    }

    pub fn parse(raw: &str, time: TimeUnit) -> Result<Self, ArchivistError> {
        let parts: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
        if parts.len() != BOOK_DEPTH_PERCENTS.len() {
            return Err(ArchivistError::FieldCount {
                kind: "book depth",
                expected: "10",
                found: parts.len(),
            });
        }
        let mut row = BookDepthRow {
            time,
            ..BookDepthRow::default()
        };
        for (slot, part) in row.buckets.iter_mut().zip(parts) {
            *slot = Unit::parse_with(part, BUCKET_DELIMITER)?.with_time(time);
        }
        Ok(row)
    }

    /// Aggregate each bucket independently across `rows`.
    pub fn aggregate(rows: &[Self], timeframe: TimeDelta, new_time: TimeUnit) -> Self {
        let mut out = BookDepthRow {
            time: new_time,
            ..BookDepthRow::default()
        };
        for (i, slot) in out.buckets.iter_mut().enumerate() {
            let column: Vec<Unit> = rows.iter().map(|r| r.buckets[i]).collect();
            *slot = Unit::aggregate(&column, timeframe, new_time);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time_unit::MIN_TIME_FRAME;

    fn values() -> [f64; 10] {
        [120.5, 98.0, 0.0, 45.25, 12.0, 10.0, 33.0, 0.0, 71.5, 150.0]
    }

    #[test]
    fn single_observations_encode_compactly() {
        let row = BookDepthRow::from_values(values(), TimeUnit(1_000));
        assert_eq!(row.serialize(2), "120.5@98@@45.25@12@10@33@@71.5@150");
    }

    #[test]
    fn round_trip_with_nested_delimiters() {
        let t = TimeUnit(1_000);
        let a = BookDepthRow::from_values(values(), t);
        let mut b_values = values();
        b_values[0] = 121.0;
        b_values[9] = 149.0;
        let b = BookDepthRow::from_values(b_values, t);
        let agg = BookDepthRow::aggregate(&[a, b], MIN_TIME_FRAME, t);

        let raw = agg.serialize(2);
        assert!(raw.starts_with("120.5|121|120.5|121|120.8|120.75|0.5|2@"));
        let back = BookDepthRow::parse(&raw, t).unwrap();
        assert_eq!(back, agg);
    }

    #[test]
    fn bucket_lookup_by_percent() {
        let row = BookDepthRow::from_values(values(), TimeUnit(0));
        assert_eq!(row.bucket(-5).unwrap().close, 120.5);
        assert_eq!(row.bucket(5).unwrap().close, 150.0);
        assert!(row.bucket(-3).unwrap().is_empty());
        assert!(row.bucket(0).is_none());
    }

    #[test]
    fn wrong_bucket_count_is_format_error() {
        assert!(matches!(
            BookDepthRow::parse("1@2@3", TimeUnit(0)),
            Err(ArchivistError::FieldCount { found: 3, .. })
        ));
    }
}
