//! Bare scalars, typically indicator outputs.

use crate::domain::column::Column;
use crate::domain::data::{Data, DataType};
use crate::domain::error::ArchivistError;
use crate::domain::format::format_float;
use crate::domain::time_unit::TimeUnit;
use chrono::TimeDelta;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub value: f64,
    pub time: TimeUnit,
}

impl Point {
    pub fn new(value: f64) -> Self {
        Point {
            value,
            time: TimeUnit::default(),
        }
    }

    /// Empty input decodes to a zero point.
    pub fn parse(raw: &str) -> Result<Self, ArchivistError> {
        if raw.is_empty() {
            return Ok(Point::default());
        }
        raw.trim()
            .parse::<f64>()
            .map(Point::new)
            .map_err(|_| ArchivistError::InvalidNumber {
                field: "value",
                value: raw.to_string(),
            })
    }
}

impl Data for Point {
    const DATA_TYPE: DataType = DataType::Point;

    fn time(&self) -> TimeUnit {
        self.time
    }

    fn with_time(mut self, time: TimeUnit) -> Self {
        self.time = time;
        self
    }

    fn is_empty(&self) -> bool {
        self.value == 0.0
    }

    fn serialize(&self, precision: i8) -> String {
        format_float(self.value, precision)
    }

    fn value_at(&self, column: Column) -> Option<f64> {
        match column {
            Column::Value => Some(self.value),
            _ => None,
        }
    }

    /// # Panics
    ///
    /// Always. Points are terminal values and have no aggregation.
    fn aggregate(_items: &[Self], _timeframe: TimeDelta, _new_time: TimeUnit) -> Self {
        panic!("point series cannot be aggregated");
    }
}
