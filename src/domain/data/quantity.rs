//! Signed flows split into independent plus and minus sides.

use crate::domain::column::Column;
use crate::domain::data::{Data, DataType, FIELD_DELIMITER, parse_count, parse_field};
use crate::domain::error::ArchivistError;
use crate::domain::format::format_float;
use crate::domain::math::safe_median;
use crate::domain::time_unit::TimeUnit;
use chrono::TimeDelta;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quantity {
    pub plus: f64,
    pub minus: f64,
    pub plus_average: f64,
    pub minus_average: f64,
    pub plus_median: f64,
    pub minus_median: f64,
    pub plus_count: i64,
    pub minus_count: i64,
    pub time: TimeUnit,
}

impl Quantity {
    /// A single signed observation. Negative values land on the minus side
    /// as a positive magnitude; zero yields an empty quantity.
    pub fn new(value: f64) -> Self {
        let magnitude = value.abs();
        if value > 0.0 {
            Quantity {
                plus: magnitude,
                plus_average: magnitude,
                plus_median: magnitude,
                plus_count: 1,
                ..Quantity::default()
            }
        } else if value < 0.0 {
            Quantity {
                minus: magnitude,
                minus_average: magnitude,
                minus_median: magnitude,
                minus_count: 1,
                ..Quantity::default()
            }
        } else {
            Quantity::default()
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ArchivistError> {
        if raw.is_empty() {
            return Ok(Quantity::default());
        }
        let fields: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
        match fields.as_slice() {
            [single] => Ok(Quantity::new(parse_field("value", single)?)),
            [
                plus,
                minus,
                plus_average,
                minus_average,
                plus_median,
                minus_median,
                plus_count,
                minus_count,
            ] => Ok(Quantity {
                plus: parse_field("plus", plus)?,
                minus: parse_field("minus", minus)?,
                plus_average: parse_field("plus_average", plus_average)?,
                minus_average: parse_field("minus_average", minus_average)?,
                plus_median: parse_field("plus_median", plus_median)?,
                minus_median: parse_field("minus_median", minus_median)?,
                plus_count: parse_count("plus_count", plus_count)?,
                minus_count: parse_count("minus_count", minus_count)?,
                time: TimeUnit::default(),
            }),
            other => Err(ArchivistError::FieldCount {
                kind: "quantity",
                expected: "1 or 8",
                found: other.len(),
            }),
        }
    }

    /// Net flow, plus minus minus.
    pub fn net(&self) -> f64 {
        self.plus - self.minus
    }
}

impl Data for Quantity {
    const DATA_TYPE: DataType = DataType::Quantity;

    fn time(&self) -> TimeUnit {
        self.time
    }

    fn with_time(mut self, time: TimeUnit) -> Self {
        self.time = time;
        self
    }

    fn is_empty(&self) -> bool {
        self.plus_count == 0 && self.minus_count == 0
    }

    fn serialize(&self, precision: i8) -> String {
        if self.plus_count + self.minus_count == 1 {
            let short = if self.plus > 0.0 {
                format_float(self.plus, precision)
            } else {
                format_float(-self.minus, precision)
            };
            // "0" would decode as no observation
            if short != "0" {
                return short;
            }
        }
        let fields = [
            format_float(self.plus, precision),
            format_float(self.minus, precision),
            format_float(self.plus_average, precision),
            format_float(self.minus_average, precision),
            format_float(self.plus_median, precision),
            format_float(self.minus_median, precision),
            self.plus_count.to_string(),
            self.minus_count.to_string(),
        ];
        fields.join(&FIELD_DELIMITER.to_string())
    }

    fn value_at(&self, column: Column) -> Option<f64> {
        match column {
            Column::Plus => Some(self.plus),
            Column::Minus => Some(self.minus),
            Column::PlusAverage => Some(self.plus_average),
            Column::MinusAverage => Some(self.minus_average),
            Column::PlusMedian => Some(self.plus_median),
            Column::MinusMedian => Some(self.minus_median),
            Column::PlusCount => Some(self.plus_count as f64),
            Column::MinusCount => Some(self.minus_count as f64),
            _ => None,
        }
    }

    /// Each side sums independently. Counts add up the children's counts,
    /// the average is side total over side count and the median is taken
    /// over the children's side magnitudes.
    fn aggregate(items: &[Self], _timeframe: TimeDelta, new_time: TimeUnit) -> Self {
        let mut out = Quantity {
            time: new_time,
            ..Quantity::default()
        };
        let mut plus_amounts = Vec::new();
        let mut minus_amounts = Vec::new();

        for q in items {
            if q.plus > 0.0 {
                out.plus += q.plus;
                out.plus_count += q.plus_count.max(1);
                plus_amounts.push(q.plus);
            }
            if q.minus > 0.0 {
                out.minus += q.minus;
                out.minus_count += q.minus_count.max(1);
                minus_amounts.push(q.minus);
            }
        }

        if out.plus_count > 0 {
            out.plus_average = out.plus / out.plus_count as f64;
        }
        if out.minus_count > 0 {
            out.minus_average = out.minus / out.minus_count as f64;
        }
        out.plus_median = safe_median(&plus_amounts);
        out.minus_median = safe_median(&minus_amounts);
        out
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] plus: {} minus: {} plus_count: {} minus_count: {}",
            self.time.unix_seconds(),
            format_float(self.plus, -1),
            format_float(self.minus, -1),
            self.plus_count,
            self.minus_count
        )
    }
}
