//! Candle-like values: open/high/low/close plus average, median, absolute sum and count.

use crate::domain::column::Column;
use crate::domain::data::{Data, DataType, FIELD_DELIMITER, parse_count, parse_field};
use crate::domain::error::ArchivistError;
use crate::domain::format::format_float;
use crate::domain::math::{precision_of, round_float, safe_average, safe_median};
use crate::domain::time_unit::{MIN_TIME_FRAME, TimeUnit};
use chrono::TimeDelta;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Unit {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub average: f64,
    pub median: f64,
    pub absolute_sum: f64,
    pub count: i64,
    pub time: TimeUnit,
}

impl Unit {
    /// A single observation. Zero is "no observation" and yields an empty unit.
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            return Unit::default();
        }
        Unit {
            open: value,
            high: value,
            low: value,
            close: value,
            average: value,
            median: value,
            absolute_sum: 0.0,
            count: 1,
            time: TimeUnit::default(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ArchivistError> {
        Self::parse_with(raw, FIELD_DELIMITER)
    }

    /// Parse a record whose fields are separated by `delimiter`.
    /// One field is a single observation, eight fields the full form.
    pub fn parse_with(raw: &str, delimiter: char) -> Result<Self, ArchivistError> {
        if raw.is_empty() {
            return Ok(Unit::default());
        }
        let fields: Vec<&str> = raw.split(delimiter).collect();
        match fields.as_slice() {
            [single] => Ok(Unit::new(parse_field("value", single)?)),
            [open, high, low, close, average, median, absolute_sum, count] => Ok(Unit {
                open: parse_field("open", open)?,
                high: parse_field("high", high)?,
                low: parse_field("low", low)?,
                close: parse_field("close", close)?,
                average: parse_field("average", average)?,
                median: parse_field("median", median)?,
                absolute_sum: parse_field("absolute_sum", absolute_sum)?,
                count: parse_count("count", count)?,
                time: TimeUnit::default(),
            }),
            other => Err(ArchivistError::FieldCount {
                kind: "unit",
                expected: "1 or 8",
                found: other.len(),
            }),
        }
    }

    /// Encode with an explicit field delimiter; a single observation is one field.
    pub fn serialize_with(&self, precision: i8, delimiter: char) -> String {
        if self.count == 1 {
            let short = format_float(self.open, precision);
            // "0" would decode as no observation
            if short != "0" || self.open == 0.0 {
                return short;
            }
        }
        let magnitudes = [
            self.open,
            self.high,
            self.low,
            self.close,
            self.average,
            self.median,
            self.absolute_sum,
        ];
        let mut fields: Vec<String> = magnitudes
            .iter()
            .map(|v| format_float(*v, precision))
            .collect();
        fields.push(self.count.to_string());
        fields.join(&delimiter.to_string())
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_str(&format!("{}", value)).unwrap_or_default()
}

// Through text so the result is the float nearest the decimal.
fn to_float(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

impl Data for Unit {
    const DATA_TYPE: DataType = DataType::Unit;

    fn time(&self) -> TimeUnit {
        self.time
    }

    fn with_time(mut self, time: TimeUnit) -> Self {
        self.time = time;
        self
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn serialize(&self, precision: i8) -> String {
        self.serialize_with(precision, FIELD_DELIMITER)
    }

    fn value_at(&self, column: Column) -> Option<f64> {
        match column {
            Column::Open => Some(self.open),
            Column::High => Some(self.high),
            Column::Low => Some(self.low),
            Column::Close => Some(self.close),
            Column::Average => Some(self.average),
            Column::Median => Some(self.median),
            Column::AbsoluteSum => Some(self.absolute_sum),
            Column::Count => Some(self.count as f64),
            _ => None,
        }
    }

    /// Entries with no observation or a zero open are skipped. From the
    /// base timeframe the absolute sum is the total of close-to-close moves
    /// between surviving entries; from coarser timeframes it is the sum of
    /// the children's absolute sums.
    fn aggregate(items: &[Self], timeframe: TimeDelta, new_time: TimeUnit) -> Self {
        let from_base = timeframe == MIN_TIME_FRAME;
        let mut out = Unit {
            time: new_time,
            ..Unit::default()
        };
        let mut closes = Vec::with_capacity(items.len());
        let mut max_close_precision = 0;
        let mut absolute_sum = Decimal::ZERO;
        let mut absolute_sum_dp = 0;
        let mut prev_close: Option<f64> = None;
        let mut skipped = 0usize;

        for unit in items {
            if unit.count == 0 || unit.open == 0.0 {
                skipped += 1;
                continue;
            }
            let close_precision = precision_of(unit.close);
            max_close_precision = max_close_precision.max(close_precision);

            if from_base {
                if let Some(prev) = prev_close {
                    if prev != unit.close {
                        absolute_sum_dp = absolute_sum_dp
                            .max(precision_of(prev))
                            .max(close_precision);
                        absolute_sum += (to_decimal(unit.close) - to_decimal(prev)).abs();
                    }
                }
            } else {
                absolute_sum_dp = absolute_sum_dp.max(precision_of(unit.absolute_sum));
                absolute_sum += to_decimal(unit.absolute_sum);
            }

            if prev_close.is_none() {
                out.open = unit.open;
                out.high = unit.high;
                out.low = unit.low;
            } else {
                out.high = out.high.max(unit.high);
                out.low = out.low.min(unit.low);
            }
            out.close = unit.close;
            out.count += unit.count;
            closes.push(unit.close);
            prev_close = Some(unit.close);
        }

        if skipped > 0 {
            debug!(skipped, total = items.len(), "skipped empty units while aggregating");
        }

        let rounded = absolute_sum
            .round_dp_with_strategy(absolute_sum_dp, RoundingStrategy::MidpointAwayFromZero);
        out.absolute_sum = to_float(rounded);
        out.average = round_float(safe_average(&closes), max_close_precision);
        out.median = safe_median(&closes);
        out
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] open: {} high: {} low: {} close: {} average: {} median: {} absolute_sum: {} count: {}",
            self.time.unix_seconds(),
            format_float(self.open, -1),
            format_float(self.high, -1),
            format_float(self.low, -1),
            format_float(self.close, -1),
            format_float(self.average, -1),
            format_float(self.median, -1),
            format_float(self.absolute_sum, -1),
            self.count
        )
    }
}
