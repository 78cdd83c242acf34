//! Typed time-series values and their compact text codec.
//!
//! Three payload shapes share the [`Data`] capability: [`Unit`] behaves like
//! a candle, [`Quantity`] splits a signed flow into plus/minus sides, and
//! [`Point`] is a terminal scalar that is never aggregated.

pub mod book_depth;
pub mod point;
pub mod quantity;
pub mod series;
pub mod unit;

pub use book_depth::{BOOK_DEPTH_PERCENTS, BookDepthRow};
pub use point::Point;
pub use quantity::Quantity;
pub use series::{AnySeries, DataList, Series};
pub use unit::Unit;

use crate::domain::column::{Column, ColumnSelection};
use crate::domain::error::ArchivistError;
use crate::domain::format::format_float;
use crate::domain::time_unit::TimeUnit;
use chrono::TimeDelta;
use std::fmt;
use std::str::FromStr;

/// Delimiter between fields of a top-level record.
pub const FIELD_DELIMITER: char = '@';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Unit,
    Quantity,
    Point,
}

const UNIT_COLUMNS: [Column; 9] = [
    Column::Time,
    Column::Open,
    Column::High,
    Column::Low,
    Column::Close,
    Column::Average,
    Column::Median,
    Column::AbsoluteSum,
    Column::Count,
];

const QUANTITY_COLUMNS: [Column; 9] = [
    Column::Time,
    Column::Plus,
    Column::Minus,
    Column::PlusAverage,
    Column::MinusAverage,
    Column::PlusMedian,
    Column::MinusMedian,
    Column::PlusCount,
    Column::MinusCount,
];

const POINT_COLUMNS: [Column; 2] = [Column::Time, Column::Value];

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Unit => "unit",
            DataType::Quantity => "qty",
            DataType::Point => "point",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            DataType::Unit => "#0066ff",
            DataType::Quantity => "#996633",
            DataType::Point => "#8000ff",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DataType::Unit => {
                "Unit: data that can be aggregated around a candle (open, close, high, low, etc)"
            }
            DataType::Quantity => "Quantity: data that can be summed up (volume, etc)",
            DataType::Point => {
                "Point: simple data that cannot be aggregated or summed, usually derived from a unit or quantity column"
            }
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            DataType::Unit => &UNIT_COLUMNS,
            DataType::Quantity => &QUANTITY_COLUMNS,
            DataType::Point => &POINT_COLUMNS,
        }
    }

    pub fn has_column(self, column: Column) -> bool {
        self.columns().contains(&column)
    }

    /// Default column an indicator reads from values of this type.
    pub fn default_column(self) -> Column {
        match self {
            DataType::Unit => Column::Close,
            DataType::Quantity => Column::Plus,
            DataType::Point => Column::Value,
        }
    }

    /// CSV header cells for the selected columns. `value` is named after the
    /// prefix alone, every other column as `prefix_column`.
    pub fn header(self, prefix: &str, selection: &ColumnSelection) -> Vec<String> {
        self.columns()
            .iter()
            .filter(|c| selection.contains(**c))
            .map(|c| match c {
                Column::Value => prefix.to_string(),
                other => format!("{}_{}", prefix, other.as_str()),
            })
            .collect()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ArchivistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(DataType::Unit),
            "qty" | "quantity" => Ok(DataType::Quantity),
            "point" => Ok(DataType::Point),
            other => Err(ArchivistError::ConfigInvalid {
                section: "data".into(),
                key: "type".into(),
                reason: format!("unknown data type {:?}", other),
            }),
        }
    }
}

/// Capability shared by every time-stamped value.
pub trait Data: Clone + fmt::Debug + PartialEq {
    const DATA_TYPE: DataType;

    fn data_type(&self) -> DataType {
        Self::DATA_TYPE
    }

    fn time(&self) -> TimeUnit;

    fn with_time(self, time: TimeUnit) -> Self;

    /// No observation in this bucket.
    fn is_empty(&self) -> bool;

    /// Compact text form; `precision < 0` keeps full precision.
    fn serialize(&self, precision: i8) -> String;

    /// Numeric value of a column this type exposes, `None` for `time` and
    /// foreign columns.
    fn value_at(&self, column: Column) -> Option<f64>;

    /// Roll `items` (all of `timeframe` resolution) into one value stamped `new_time`.
    fn aggregate(items: &[Self], timeframe: TimeDelta, new_time: TimeUnit) -> Self;

    /// CSV cells for the selected columns, in column declaration order.
    /// Zero magnitudes and zero counts render as empty cells.
    fn csv_row(&self, precision: i8, selection: &ColumnSelection) -> Vec<String> {
        Self::DATA_TYPE
            .columns()
            .iter()
            .filter(|c| selection.contains(**c))
            .map(|column| match column {
                Column::Time if self.time().0 > 0 => self.time().unix_seconds().to_string(),
                Column::Time => String::new(),
                c => match self.value_at(*c) {
                    Some(v) if v != 0.0 && c.is_count() => format!("{}", v as i64),
                    Some(v) if v != 0.0 => format_float(v, precision),
                    _ => String::new(),
                },
            })
            .collect()
    }
}

/// A value of any data type, for callers that pick the type at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Unit(Unit),
    Quantity(Quantity),
    Point(Point),
}

impl Sample {
    /// Single observation of `value` as the given type.
    pub fn new(data_type: DataType, value: f64, time: TimeUnit) -> Self {
        match data_type {
            DataType::Unit => Sample::Unit(Unit::new(value).with_time(time)),
            DataType::Quantity => Sample::Quantity(Quantity::new(value).with_time(time)),
            DataType::Point => Sample::Point(Point::new(value).with_time(time)),
        }
    }

    pub fn parse(data_type: DataType, raw: &str, time: TimeUnit) -> Result<Self, ArchivistError> {
        Ok(match data_type {
            DataType::Unit => Sample::Unit(Unit::parse(raw)?.with_time(time)),
            DataType::Quantity => Sample::Quantity(Quantity::parse(raw)?.with_time(time)),
            DataType::Point => Sample::Point(Point::parse(raw)?.with_time(time)),
        })
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Sample::Unit(_) => DataType::Unit,
            Sample::Quantity(_) => DataType::Quantity,
            Sample::Point(_) => DataType::Point,
        }
    }

    pub fn time(&self) -> TimeUnit {
        match self {
            Sample::Unit(u) => u.time(),
            Sample::Quantity(q) => q.time(),
            Sample::Point(p) => p.time(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Sample::Unit(u) => u.is_empty(),
            Sample::Quantity(q) => q.is_empty(),
            Sample::Point(p) => p.is_empty(),
        }
    }

    pub fn serialize(&self, precision: i8) -> String {
        match self {
            Sample::Unit(u) => u.serialize(precision),
            Sample::Quantity(q) => q.serialize(precision),
            Sample::Point(p) => p.serialize(precision),
        }
    }

    pub fn value_at(&self, column: Column) -> Option<f64> {
        match self {
            Sample::Unit(u) => u.value_at(column),
            Sample::Quantity(q) => q.value_at(column),
            Sample::Point(p) => p.value_at(column),
        }
    }

    pub fn csv_row(&self, precision: i8, selection: &ColumnSelection) -> Vec<String> {
        match self {
            Sample::Unit(u) => u.csv_row(precision, selection),
            Sample::Quantity(q) => q.csv_row(precision, selection),
            Sample::Point(p) => p.csv_row(precision, selection),
        }
    }
}

impl From<Unit> for Sample {
    fn from(u: Unit) -> Self {
        Sample::Unit(u)
    }
}

impl From<Quantity> for Sample {
    fn from(q: Quantity) -> Self {
        Sample::Quantity(q)
    }
}

impl From<Point> for Sample {
    fn from(p: Point) -> Self {
        Sample::Point(p)
    }
}

/// Parse one `@`-delimited float field, naming the field on failure.
pub(crate) fn parse_field(field: &'static str, raw: &str) -> Result<f64, ArchivistError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ArchivistError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

pub(crate) fn parse_count(field: &'static str, raw: &str) -> Result<i64, ArchivistError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ArchivistError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_metadata() {
        assert_eq!(DataType::Unit.to_string(), "unit");
        assert_eq!(DataType::Quantity.to_string(), "qty");
        assert_eq!("point".parse::<DataType>().unwrap(), DataType::Point);
        assert_eq!(DataType::Quantity.color(), "#996633");
        assert_eq!(DataType::Unit.columns().len(), 9);
        assert!(DataType::Point.has_column(Column::Value));
        assert!(!DataType::Point.has_column(Column::Close));
    }

    #[test]
    fn header_uses_prefix_for_value() {
        let sel = ColumnSelection::from_names(&["value", "time"]).unwrap();
        assert_eq!(DataType::Point.header("rsi", &sel), vec!["rsi_time", "rsi"]);
        let sel = ColumnSelection::from_names(&["close", "count"]).unwrap();
        assert_eq!(
            DataType::Unit.header("btc", &sel),
            vec!["btc_close", "btc_count"]
        );
    }

    #[test]
    fn sample_dispatches_by_type() {
        let t = TimeUnit(1_700_000_000_000);
        let s = Sample::new(DataType::Quantity, -3.5, t);
        assert_eq!(s.data_type(), DataType::Quantity);
        assert_eq!(s.time(), t);
        assert_eq!(s.value_at(Column::Minus), Some(3.5));
        assert_eq!(s.serialize(2), "-3.5");

        let parsed = Sample::parse(DataType::Unit, "", t).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn csv_row_blanks_zero_cells() {
        let t = TimeUnit(1_700_000_000_000);
        let q = Sample::new(DataType::Quantity, 12.0, t);
        let row = q.csv_row(2, &ColumnSelection::all());
        assert_eq!(row, vec!["1700000000", "12", "", "12", "", "12", "", "1", ""]);
    }
}
